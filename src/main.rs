use eframe::egui;
use idphotofe::{app::IdPhotoApp, cli, logger};

fn main() -> Result<(), eframe::Error> {
    // -- CLI / headless mode ---------------------------------------------
    if cli::CliArgs::is_cli_mode() {
        use clap::Parser;
        let args = cli::CliArgs::parse();
        let code = cli::run(args);
        std::process::exit(if code == std::process::ExitCode::SUCCESS {
            0
        } else {
            1
        });
    }

    // -- GUI mode --------------------------------------------------------

    // Initialize session log (overwrites previous session log)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([940.0, 640.0])
            .with_title("IdPhotoFE"),
        ..Default::default()
    };

    eframe::run_native(
        "IdPhotoFE",
        options,
        Box::new(|cc| Box::new(IdPhotoApp::new(cc))),
    )
}
