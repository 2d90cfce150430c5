//! Funcport - a terminal front-end for serverless Functions apps
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use clap::Parser;
use funcport_api::{PortalClient, ResourceIds};
use funcport_app::{load_settings, Settings};
use funcport_core::prelude::*;

/// Environment variable holding the management-plane bearer token.
const TOKEN_ENV: &str = "FUNCPORT_TOKEN";

/// Funcport - browse, edit, and test serverless Functions from the terminal
#[derive(Parser, Debug)]
#[command(name = "funcport")]
#[command(about = "A terminal front-end for serverless Functions apps", long_about = None)]
struct Args {
    /// Full function resource id (…/sites/{app}/functions/{name})
    #[arg(value_name = "FUNCTION_ID")]
    function_id: Option<String>,

    /// Function app site resource id (combine with --function)
    #[arg(long, value_name = "RESOURCE_ID")]
    site: Option<String>,

    /// Function name within the app
    #[arg(long, value_name = "NAME")]
    function: Option<String>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    funcport_core::logging::init()?;

    let args = Args::parse();
    let base_dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let settings = load_settings(&base_dir);

    let ids = match resolve_target(&args, &settings) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("❌ {e}");
            eprintln!();
            eprintln!("Tell funcport which function to open:");
            eprintln!("  funcport /subscriptions/…/sites/my-app/functions/my-func");
            eprintln!("  funcport --site /subscriptions/…/sites/my-app --function my-func");
            eprintln!();
            eprintln!("or set [target] site_id / function_name in .funcport/config.toml");
            std::process::exit(1);
        }
    };

    let token = match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.is_empty() => token,
        _ => {
            eprintln!("❌ {TOKEN_ENV} is not set.");
            eprintln!("   Export a management-plane bearer token before starting:");
            eprintln!("   export {TOKEN_ENV}=$(az account get-access-token --query accessToken -o tsv)");
            std::process::exit(1);
        }
    };

    let client = match settings.portal.insights_base.as_deref() {
        Some(insights_base) => PortalClient::with_insights_base(
            &settings.portal.management_base,
            insights_base,
            token,
        )?,
        None => PortalClient::new(&settings.portal.management_base, token)?,
    };

    info!(
        "Opening function {} under {}",
        ids.function_name, ids.site_id
    );
    funcport_tui::run(client, ids).await?;
    Ok(())
}

/// CLI arguments win over the config file; a full function id wins over the
/// site/function pair.
fn resolve_target(args: &Args, settings: &Settings) -> Result<ResourceIds> {
    if let Some(function_id) = &args.function_id {
        return ResourceIds::from_function_id(function_id);
    }

    let site = args
        .site
        .clone()
        .or_else(|| settings.target.site_id.clone());
    let function = args
        .function
        .clone()
        .or_else(|| settings.target.function_name.clone());

    match (site, function) {
        (Some(site), Some(function)) => Ok(ResourceIds::new(site, function)),
        _ => Err(Error::resource("no target function configured")),
    }
}
