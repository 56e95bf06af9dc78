use crate::EngineArgs;
use embark_core::installation;

pub fn run(args: EngineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let information = installation::detect(&args.home)?;
    println!("{}", serde_json::to_string_pretty(&information)?);
    Ok(())
}
