use assetcheck_lib::cli::{
    ResolvedCommand, parse_args, resolve_command, run_check, run_check_zip, run_verify_file,
};
use assetcheck_lib::error::AssetCheckError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), AssetCheckError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    match command {
        ResolvedCommand::Check(params) => run_check(params).await?,
        ResolvedCommand::VerifyFile(params) => run_verify_file(params).await?,
        ResolvedCommand::CheckZip(params) => run_check_zip(params).await?,
    }

    Ok(())
}
