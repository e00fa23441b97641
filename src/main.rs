use clap::Parser;
use jose::cmd::JoseArgs;
use log::LevelFilter;
use std::io::Read;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let app = JoseArgs::parse();

    let mut pdata = Vec::with_capacity(1024);
    if app.pipe {
        if let Err(e) = std::io::stdin().lock().read_to_end(&mut pdata) {
            log::error!("read stdin failed, {e}");
            return ExitCode::FAILURE;
        }
    }
    let pipe = app.pipe.then_some(pdata.as_slice());

    match jose::log_error(app.exe(pipe)) {
        Some(true) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
