use faktura_core::error::FakturaError;
use faktura_core::model::AnalysisResult;

pub fn print(result: &AnalysisResult) -> Result<(), FakturaError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
