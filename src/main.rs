mod app;
mod rates;
mod sim;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long)]
    rates: Option<String>,
    #[arg(long)]
    history: Option<String>,
    #[arg(long, default_value = "EUR")]
    currency: String,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "fx-orbit",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::FxOrbitApp::new(
                cc,
                app::DataSources {
                    rates_path: args.rates.clone(),
                    history_path: args.history.clone(),
                    requested: args.currency.to_ascii_uppercase(),
                },
            )))
        }),
    )
}
