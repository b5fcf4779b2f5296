use crate::hydro::{PlantParameters, PowerEstimate};

/// Builds the system prompt describing the plant to the chat service.
///
/// # Arguments
///
/// * `plant` - Current plant inputs
/// * `estimate` - Single-point estimate for `plant`
/// * `response_language` - Language the assistant should answer in
pub fn technical_brief(
    plant: &PlantParameters,
    estimate: &PowerEstimate,
    response_language: &str,
) -> String {
    format!(
        "You are HydroGPT, an intelligent technical assistant for water efficiency.\n\
         You help users reduce losses in water networks and optimise hydroelectric \
         production by analysing flow rate, hydraulic head and piezometric head.\n\
         You also advise on turbine types and on the solutions best suited to aqueducts.\n\
         \n\
         Plant data:\n\
         - Average flow rate: {:.1} l/s\n\
         - Available hydraulic head: {:.1} m\n\
         - Network losses: {}%\n\
         - Current piezometric head: {:.1} m\n\
         - Estimated power: {:.2} kW\n\
         \n\
         Answer in a technical but understandable way, in {response_language}.",
        plant.flow_rate_lps(),
        plant.head_m(),
        plant.loss_percent(),
        plant.piezometric_head_m(),
        estimate.power_kw,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brief_embeds_plant_values() {
        let plant = PlantParameters::default();
        let brief = technical_brief(&plant, &plant.estimate(), "Italian");
        assert!(brief.contains("- Average flow rate: 50.0 l/s"));
        assert!(brief.contains("- Available hydraulic head: 80.0 m"));
        assert!(brief.contains("- Network losses: 18%"));
        assert!(brief.contains("- Current piezometric head: 120.0 m"));
        assert!(brief.contains("- Estimated power: 22.52 kW"));
        assert!(brief.ends_with("in Italian."));
    }

    #[test]
    fn fractional_loss_is_kept() {
        let plant = PlantParameters::new(10.0, 20.0, 12.5, 0.7).unwrap();
        let brief = technical_brief(&plant, &plant.estimate(), "English");
        assert!(brief.contains("- Network losses: 12.5%"));
    }
}
