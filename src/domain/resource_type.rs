//! Closed set of FHIR resource types handled by the de-identification engine
//!
//! Every variant has a rule row in [`crate::deid::rules`]. A `resourceType`
//! string that does not parse into this enum is an unhandled type: its
//! identity is still pseudonymized, but no field-level rewriting happens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares the enum, `ALL` and `as_str` from one variant list
macro_rules! resource_types {
    ($($variant:ident),+ $(,)?) => {
        /// FHIR R4 resource types with a de-identification rule row
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ResourceType {
            $($variant,)+
        }

        impl ResourceType {
            /// Every known resource type, in declaration order
            pub const ALL: [ResourceType; [$(stringify!($variant)),+].len()] =
                [$(Self::$variant),+];

            /// The `resourceType` tag as it appears on the wire
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

resource_types! {
    AllergyIntolerance,
    Appointment,
    CarePlan,
    Claim,
    ClinicalImpression,
    Composition,
    Condition,
    DiagnosticReport,
    Encounter,
    EpisodeOfCare,
    HealthcareService,
    ImagingStudy,
    Immunization,
    List,
    Location,
    Media,
    Medication,
    MedicationAdministration,
    MedicationDispense,
    MedicationRequest,
    MedicationStatement,
    Observation,
    OperationOutcome,
    Organization,
    Patient,
    Practitioner,
    PractitionerRole,
    Procedure,
    QuestionnaireResponse,
    RelatedPerson,
    ServiceRequest,
    Specimen,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|resource_type| resource_type.as_str() == s)
            .ok_or_else(|| format!("Unhandled resource type: {s}"))
    }
}
