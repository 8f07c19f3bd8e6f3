#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

fn main() -> anyhow::Result<std::process::ExitCode> {
    mesh_policy_validator::Args::parse_and_run()
}
