//! Column names of the input and output tables

/// Reporting year
pub const YEAR: &str = "Anio";
/// Reported (then aligned) epidemiological week
pub const WEEK: &str = "Semana";
/// Administrative region (state)
pub const REGION: &str = "Entidad";
/// Running total of male cases
pub const CUMULATIVE_MALE: &str = "Acumulado_hombres";
/// Running total of female cases
pub const CUMULATIVE_FEMALE: &str = "Acumulado_mujeres";
/// Monday of the aligned epidemiological week
pub const DATE: &str = "Fecha";
/// Male running total of the preceding row in the region series
pub const PREVIOUS_MALE: &str = "Prev_hombres";
/// Female running total of the preceding row in the region series
pub const PREVIOUS_FEMALE: &str = "Prev_mujeres";
/// Corrected male new cases
pub const INCREMENT_MALE: &str = "Incremento_hombres";
/// Corrected female new cases
pub const INCREMENT_FEMALE: &str = "Incremento_mujeres";

/// Aggregated male new cases
pub const AGG_INCREMENT_MALE: &str = "incrementos_hombres";
/// Aggregated female new cases
pub const AGG_INCREMENT_FEMALE: &str = "incrementos_mujeres";
/// Macro-region of an aggregated row
pub const MACRO_REGION: &str = "Region";

/// Columns the pipeline reads
pub const INPUT_COLUMNS: [&str; 5] = [YEAR, WEEK, REGION, CUMULATIVE_MALE, CUMULATIVE_FEMALE];

/// Columns the pipeline derives
pub const DERIVED_COLUMNS: [&str; 5] = [
    DATE,
    PREVIOUS_MALE,
    PREVIOUS_FEMALE,
    INCREMENT_MALE,
    INCREMENT_FEMALE,
];
