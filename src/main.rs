mod app;
mod data;
mod hierarchy;
mod layout;
mod util;

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// CSV file to visualize.
    dataset: PathBuf,

    /// Numeric column plotted on the scatterplot x axis.
    #[arg(long)]
    x_attribute: Option<String>,

    /// Numeric column plotted on the scatterplot y axis.
    #[arg(long)]
    y_attribute: Option<String>,

    /// Categorical column the hierarchy groups by.
    #[arg(long)]
    group_attribute: Option<String>,

    /// Numeric column that weights hierarchy glyphs; defaults to record count.
    #[arg(long)]
    weight_attribute: Option<String>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let initial = app::InitialParams {
        x_attribute: args.x_attribute,
        y_attribute: args.y_attribute,
        group_attribute: args.group_attribute,
        weight_attribute: args.weight_attribute,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "datalens",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::DataLensApp::new(cc, args.dataset.clone(), initial.clone())))
        }),
    )
}
