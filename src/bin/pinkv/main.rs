use anyhow::Result;
use env_logger::{Builder, Env};

mod cli;
mod util;
mod cmd_load;
mod cmd_put;
mod cmd_get;
mod cmd_del;
mod cmd_show;
mod cmd_descr;
mod cmd_unpin;
mod cmd_demo;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    // Пример: RUST_LOG=debug ./pinkv ...
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Load { root, module, global, spec, spec_json } =>
            cmd_load::exec(root, module, global, spec, spec_json),

        cli::Cmd::Put { root, module, global, table, key, value, mode } =>
            cmd_put::exec(root, module, global, table, key, value, mode),

        cli::Cmd::Get { root, module, global, table, key, out } =>
            cmd_get::exec(root, module, global, table, key, out),

        cli::Cmd::Del { root, module, global, table, key } =>
            cmd_del::exec(root, module, global, table, key),

        cli::Cmd::Show { root, module, global, table, json } =>
            cmd_show::exec(root, module, global, table, json),

        cli::Cmd::Descr { root, module, global, table, json } =>
            cmd_descr::exec(root, module, global, table, json),

        cli::Cmd::Unpin { root, module, global, table } =>
            cmd_unpin::exec(root, module, global, table),

        cli::Cmd::Demo {} =>
            cmd_demo::exec(),
    }
}
