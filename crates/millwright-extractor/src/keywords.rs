//! Keyword vocabularies for the candidate-line pre-filter
//!
//! Both lists are matched as lowercase substrings. The asset vocabulary is
//! deliberately broad (recall-biased): a false positive costs a few extra
//! lines in the prompt, a false negative loses an asset for good.

/// Terms that indicate a line plausibly describes a physical asset.
pub const ASSET_KEYWORDS: &[&str] = &[
    // Power generation
    "furnace",
    "generator",
    "genset",
    "diesel generator",
    "gas generator",
    "emergency generator",
    "backup generator",
    "turbine",
    "gas turbine",
    "steam turbine",
    "engine",
    "internal combustion engine",
    "combustion engine",
    // Electrical
    "transformer",
    "power transformer",
    "distribution transformer",
    "substation",
    "switchgear",
    "circuit breaker",
    "electrical panel",
    "electrical installation",
    // Energy storage
    "battery",
    "batteries",
    "battery system",
    "battery storage",
    "energy storage",
    "bess",
    "ups",
    "uninterruptible power supply",
    // Power units
    "kw",
    "mw",
    "kva",
    "mva",
    "kwh",
    "mwh",
    "vah",
    // Thermal
    "boiler",
    "steam boiler",
    "hot water boiler",
    "heater",
    "kiln",
    "burner",
    "oven",
    "glass furnace",
    "melting furnace",
    // Cooling / HVAC
    "chiller",
    "cooling system",
    "cooling unit",
    "cooling tower",
    "heat pump",
    "hvac",
    "air conditioning",
    // Gases / fuel
    "hydrogen",
    "h2",
    "electrolyser",
    "electrolyzer",
    "reformer",
    "natural gas",
    "gas installation",
    "nm3/h",
    "m3/h",
    "diesel",
    "fuel oil",
    "light fuel oil",
    "heavy fuel oil",
    // Mechanical
    "compressor",
    "air compressor",
    "pump",
    "industrial pump",
    "motor",
    "electric motor",
    "fan",
    // Storage vessels
    "tank",
    "storage tank",
    "well",
    "groundwater",
    "water well",
    "storage capacity",
    "storage volume",
    "container",
    // Grid / demand
    "load shedding",
    "peak shaving",
    "demand response",
    "flexibility",
    "energy management",
    "ems",
    // General power terms
    "capacity",
    "rated power",
    "nominal power",
    "maximum power",
    "installed power",
    "thermal input",
    "rated thermal",
    "production capacity",
    "tonnes per day",
    "tonnes/day",
    "litres",
    "m3",
    "nm3",
];

/// Regulatory and compliance terms that mark a line as noise.
///
/// Exclusion takes precedence over the asset vocabulary: a line matching
/// both is dropped.
pub const EXCLUDE_KEYWORDS: &[&str] = &[
    "hydrogen fluoride",
    "sodium hydroxide",
    "emission",
    "limit",
    "concentration",
    "mg/nm3",
    "regulation",
    "decree",
    "permit",
    "compliance",
    "monitoring",
    "sampling",
    "standard",
    "requirement",
];
