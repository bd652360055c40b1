#![allow(unused_imports)]
#![allow(unused_variables)]
pub mod common;
pub mod deployer_e2e;

use common::Error;
use deployer_e2e::{deployer_e2e_test, deployer_no_host_e2e_test};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args: Vec<String> = env::args().collect();
    let cmd = args.get(1).cloned().unwrap_or_default();
    match cmd.as_str() {
        "deployer" => {
            println!("Running deployer end-to-end test");
            deployer_e2e_test().await
        }
        "deployer-no-host" => {
            println!("Running deployer end-to-end test without a routing host");
            deployer_no_host_e2e_test().await
        }
        _ => {
            println!("Please specify one test: deployer or deployer-no-host");
            Ok(())
        }
    }
}
