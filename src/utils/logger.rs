use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

const DEFAULT_FILTER: &str = "warn,yt_dubbing=info";

/// Initialise the global logger. Output goes to stderr: stdout carries the
/// host's message stream.
pub fn init_logger() {
    // RUST_LOG overrides the default filter
    let env = Env::default().filter_or("RUST_LOG", DEFAULT_FILTER);

    let mut builder = Builder::from_env(env);

    // keep the HTTP stack quiet
    builder
        .filter_module("hyper", LevelFilter::Error)
        .filter_module("hyper_util", LevelFilter::Error)
        .filter_module("mio", LevelFilter::Error)
        .filter_module("rustls", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr);

    // a second init (e.g. in tests) is not an error
    if let Err(e) = builder.try_init() {
        eprintln!("Logger already initialised: {}", e);
    }
}
