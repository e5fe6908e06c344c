//! Version information display
//!
//! Prints the crate version in human or JSON format.

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::clock::READY_LEAD_IN;

/// Print version information.
pub fn run(args: &VersionArgs) {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    match args.format {
        OutputFormat::Human => {
            println!("{name} {version}");
        }
        OutputFormat::Json => {
            let info = serde_json::json!({
                "name": name,
                "version": version,
                "default_lead_in": READY_LEAD_IN,
            });
            println!("{info}");
        }
    }
}
