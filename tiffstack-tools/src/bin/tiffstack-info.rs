use tracing_subscriber::prelude::*;

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: tiffstack-info <TIFF_PATH>");
        std::process::exit(1);
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::builder().from_env_lossy())
        .with(tracing_subscriber::fmt::Layer::default().compact())
        .init();

    let reader = match tiffstack::Reader::open(&path) {
        Ok(reader) => reader,
        Err(err) => {
            eprintln!("{path}: {err}");
            std::process::exit(1);
        }
    };

    print!("{}", reader.debug_dump());
}
