use serde::{Deserialize, Serialize};

/// Domain markers recognised in order and history text.
///
/// The set is fixed; adding a marker means adding a variant here, a field on
/// [`FlagSet`], and a rule in the detector's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Marker {
    #[serde(rename = "institutional-packaging")]
    InstitutionalPackaging,
    #[serde(rename = "risk-class-B")]
    RiskClassB,
    #[serde(rename = "risk-class-3A")]
    RiskClass3A,
    #[serde(rename = "risk-class-3B")]
    RiskClass3B,
    #[serde(rename = "risk-class-C")]
    RiskClassC,
    #[serde(rename = "oral-dose-type-ha")]
    OralDoseTypeHa,
    #[serde(rename = "oral-dose-type-ro")]
    OralDoseTypeRo,
}

impl Marker {
    pub const ALL: [Marker; 7] = [
        Marker::InstitutionalPackaging,
        Marker::RiskClassB,
        Marker::RiskClass3A,
        Marker::RiskClass3B,
        Marker::RiskClassC,
        Marker::OralDoseTypeHa,
        Marker::OralDoseTypeRo,
    ];

    /// Stable wire name, identical to the serde representation.
    pub fn wire_name(self) -> &'static str {
        match self {
            Marker::InstitutionalPackaging => "institutional-packaging",
            Marker::RiskClassB => "risk-class-B",
            Marker::RiskClass3A => "risk-class-3A",
            Marker::RiskClass3B => "risk-class-3B",
            Marker::RiskClassC => "risk-class-C",
            Marker::OralDoseTypeHa => "oral-dose-type-ha",
            Marker::OralDoseTypeRo => "oral-dose-type-ro",
        }
    }
}

/// Boolean outcome of marker detection, one entry per [`Marker`].
///
/// Every entry defaults to `false`; there is no "unknown" state. A set is
/// derived once per operation and never mutated after it leaves the detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagSet {
    #[serde(rename = "institutional-packaging")]
    pub institutional_packaging: bool,
    #[serde(rename = "risk-class-B")]
    pub risk_class_b: bool,
    #[serde(rename = "risk-class-3A")]
    pub risk_class_3a: bool,
    #[serde(rename = "risk-class-3B")]
    pub risk_class_3b: bool,
    #[serde(rename = "risk-class-C")]
    pub risk_class_c: bool,
    #[serde(rename = "oral-dose-type-ha")]
    pub oral_dose_type_ha: bool,
    #[serde(rename = "oral-dose-type-ro")]
    pub oral_dose_type_ro: bool,
}

impl FlagSet {
    pub fn get(&self, marker: Marker) -> bool {
        match marker {
            Marker::InstitutionalPackaging => self.institutional_packaging,
            Marker::RiskClassB => self.risk_class_b,
            Marker::RiskClass3A => self.risk_class_3a,
            Marker::RiskClass3B => self.risk_class_3b,
            Marker::RiskClassC => self.risk_class_c,
            Marker::OralDoseTypeHa => self.oral_dose_type_ha,
            Marker::OralDoseTypeRo => self.oral_dose_type_ro,
        }
    }

    /// Builder-style setter used while the set is being derived.
    pub fn with(mut self, marker: Marker, value: bool) -> Self {
        let slot = match marker {
            Marker::InstitutionalPackaging => &mut self.institutional_packaging,
            Marker::RiskClassB => &mut self.risk_class_b,
            Marker::RiskClass3A => &mut self.risk_class_3a,
            Marker::RiskClass3B => &mut self.risk_class_3b,
            Marker::RiskClassC => &mut self.risk_class_c,
            Marker::OralDoseTypeHa => &mut self.oral_dose_type_ha,
            Marker::OralDoseTypeRo => &mut self.oral_dose_type_ro,
        };
        *slot = value;
        self
    }

    /// Markers whose flag is set, in [`Marker::ALL`] order.
    pub fn present(&self) -> Vec<Marker> {
        Marker::ALL.into_iter().filter(|m| self.get(*m)).collect()
    }

    pub fn any(&self) -> bool {
        Marker::ALL.iter().any(|m| self.get(*m))
    }

    /// Union of two sets (a marker present in either is present).
    pub fn union(self, other: FlagSet) -> FlagSet {
        Marker::ALL
            .into_iter()
            .fold(self, |acc, m| acc.with(m, acc.get(m) || other.get(m)))
    }
}
