//! Resource rule registry
//!
//! Declarative table of, for every known resource type:
//! - the member paths that hold `Reference` values,
//! - the directly identifying members to remove outright.
//!
//! A path is a list of JSON member names. Arrays met anywhere along a path
//! are walked element by element, so `["participant", "actor"]` reaches the
//! `actor` of every `participant`, and `["basedOn"]` reaches every element of
//! a repeated `basedOn`.
//!
//! The lookup in [`rule_for`] is an exhaustive `match`: adding a variant to
//! [`ResourceType`] without a row here is a compile error.

use crate::domain::ResourceType;

/// A member path from the resource root to zero or more references
pub type FieldPath = &'static [&'static str];

/// Rule row for one resource type
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceRule {
    /// Paths to reference-bearing members, in visiting order
    pub references: &'static [FieldPath],
    /// Members removed from the resource
    pub clear: &'static [&'static str],
}

impl ResourceRule {
    /// True when the row neither rewrites references nor clears fields
    pub fn is_empty(&self) -> bool {
        self.references.is_empty() && self.clear.is_empty()
    }
}

static NO_RULES: ResourceRule = ResourceRule {
    references: &[],
    clear: &[],
};

static ALLERGY_INTOLERANCE: ResourceRule = ResourceRule {
    references: &[&["patient"], &["encounter"], &["recorder"], &["asserter"]],
    clear: &[],
};

static APPOINTMENT: ResourceRule = ResourceRule {
    references: &[
        &["reasonReference"],
        &["supportingInformation"],
        &["slot"],
        &["basedOn"],
        &["participant", "actor"],
    ],
    clear: &[],
};

static CARE_PLAN: ResourceRule = ResourceRule {
    references: &[
        &["basedOn"],
        &["replaces"],
        &["partOf"],
        &["subject"],
        &["encounter"],
        &["author"],
        &["contributor"],
        &["careTeam"],
        &["addresses"],
        &["supportingInfo"],
        &["goal"],
        &["activity", "reference"],
        &["activity", "outcomeReference"],
    ],
    clear: &[],
};

static CLAIM: ResourceRule = ResourceRule {
    references: &[
        &["patient"],
        &["enterer"],
        &["insurer"],
        &["provider"],
        &["referral"],
    ],
    clear: &[],
};

static CLINICAL_IMPRESSION: ResourceRule = ResourceRule {
    references: &[
        &["subject"],
        &["encounter"],
        &["assessor"],
        &["previous"],
        &["problem"],
        &["prognosisReference"],
        &["supportingInfo"],
    ],
    clear: &[],
};

static COMPOSITION: ResourceRule = ResourceRule {
    references: &[&["subject"], &["encounter"], &["author"], &["custodian"]],
    clear: &[],
};

static CONDITION: ResourceRule = ResourceRule {
    references: &[
        &["subject"],
        &["encounter"],
        &["recorder"],
        &["asserter"],
        &["stage", "assessment"],
        &["evidence", "detail"],
    ],
    clear: &[],
};

static DIAGNOSTIC_REPORT: ResourceRule = ResourceRule {
    references: &[
        &["basedOn"],
        &["subject"],
        &["encounter"],
        &["performer"],
        &["resultsInterpreter"],
        &["specimen"],
        &["result"],
        &["imagingStudy"],
    ],
    clear: &[],
};

static ENCOUNTER: ResourceRule = ResourceRule {
    references: &[
        &["subject"],
        &["episodeOfCare"],
        &["basedOn"],
        &["participant", "individual"],
        &["appointment"],
        &["reasonReference"],
        &["diagnosis", "condition"],
        &["account"],
        &["hospitalization", "origin"],
        &["hospitalization", "destination"],
        &["location", "location"],
        &["serviceProvider"],
        &["partOf"],
    ],
    clear: &[],
};

static EPISODE_OF_CARE: ResourceRule = ResourceRule {
    references: &[
        &["diagnosis", "condition"],
        &["patient"],
        &["managingOrganization"],
        &["referralRequest"],
        &["careManager"],
        &["team"],
        &["account"],
    ],
    clear: &[],
};

static HEALTHCARE_SERVICE: ResourceRule = ResourceRule {
    references: &[
        &["providedBy"],
        &["location"],
        &["coverageArea"],
        &["endpoint"],
    ],
    clear: &[],
};

static IMAGING_STUDY: ResourceRule = ResourceRule {
    references: &[
        &["subject"],
        &["encounter"],
        &["basedOn"],
        &["interpreter"],
        &["endpoint"],
        &["procedureReference"],
        &["location"],
        &["reasonReference"],
        &["series", "endpoint"],
        &["series", "specimen"],
        &["series", "performer", "actor"],
    ],
    clear: &[],
};

static IMMUNIZATION: ResourceRule = ResourceRule {
    references: &[
        &["patient"],
        &["encounter"],
        &["location"],
        &["manufacturer"],
        &["performer", "actor"],
        &["reasonReference"],
        &["reaction", "detail"],
        &["protocolApplied", "authority"],
    ],
    clear: &[],
};

static LIST: ResourceRule = ResourceRule {
    references: &[&["subject"], &["encounter"], &["source"]],
    clear: &[],
};

static LOCATION: ResourceRule = ResourceRule {
    references: &[&["managingOrganization"], &["partOf"], &["endpoint"]],
    clear: &[],
};

static MEDIA: ResourceRule = ResourceRule {
    references: &[
        &["basedOn"],
        &["partOf"],
        &["subject"],
        &["encounter"],
        &["operator"],
        &["device"],
    ],
    clear: &[],
};

static MEDICATION: ResourceRule = ResourceRule {
    references: &[&["manufacturer"]],
    clear: &[],
};

static MEDICATION_ADMINISTRATION: ResourceRule = ResourceRule {
    references: &[
        &["partOf"],
        &["subject"],
        &["context"],
        &["supportingInformation"],
        &["reasonReference"],
        &["request"],
        &["device"],
        &["eventHistory"],
    ],
    clear: &[],
};

static MEDICATION_DISPENSE: ResourceRule = ResourceRule {
    references: &[
        &["partOf"],
        &["subject"],
        &["context"],
        &["supportingInformation"],
        &["location"],
        &["authorizingPrescription"],
        &["destination"],
        &["receiver"],
        &["detectedIssue"],
        &["eventHistory"],
    ],
    clear: &[],
};

static MEDICATION_REQUEST: ResourceRule = ResourceRule {
    references: &[
        &["subject"],
        &["encounter"],
        &["supportingInformation"],
        &["requester"],
        &["performer"],
        &["recorder"],
        &["reasonReference"],
        &["basedOn"],
        &["insurance"],
        &["priorPrescription"],
    ],
    clear: &[],
};

static MEDICATION_STATEMENT: ResourceRule = ResourceRule {
    references: &[
        &["basedOn"],
        &["partOf"],
        &["subject"],
        &["context"],
        &["informationSource"],
        &["derivedFrom"],
        &["reasonReference"],
    ],
    clear: &[],
};

static OBSERVATION: ResourceRule = ResourceRule {
    references: &[
        &["basedOn"],
        &["partOf"],
        &["subject"],
        &["focus"],
        &["encounter"],
        &["performer"],
        &["specimen"],
        &["device"],
        &["hasMember"],
    ],
    clear: &[],
};

static ORGANIZATION: ResourceRule = ResourceRule {
    references: &[&["partOf"], &["endpoint"]],
    clear: &[],
};

static PATIENT: ResourceRule = ResourceRule {
    references: &[&["managingOrganization"], &["link", "other"]],
    clear: &[
        "identifier",
        "extension",
        "name",
        "telecom",
        "address",
        "photo",
        "contact",
    ],
};

static PROCEDURE: ResourceRule = ResourceRule {
    references: &[
        &["basedOn"],
        &["partOf"],
        &["subject"],
        &["encounter"],
        &["recorder"],
        &["asserter"],
        &["location"],
        &["reasonReference"],
        &["complicationDetail"],
        &["usedReference"],
    ],
    clear: &[],
};

static QUESTIONNAIRE_RESPONSE: ResourceRule = ResourceRule {
    references: &[
        &["basedOn"],
        &["partOf"],
        &["subject"],
        &["encounter"],
        &["author"],
        &["source"],
    ],
    clear: &[],
};

static RELATED_PERSON: ResourceRule = ResourceRule {
    references: &[&["patient"]],
    clear: &[],
};

static SERVICE_REQUEST: ResourceRule = ResourceRule {
    references: &[
        &["basedOn"],
        &["replaces"],
        &["subject"],
        &["encounter"],
        &["requester"],
        &["performer"],
        &["locationReference"],
        &["reasonReference"],
        &["insurance"],
        &["supportingInfo"],
        &["specimen"],
        &["relevantHistory"],
    ],
    clear: &[],
};

static SPECIMEN: ResourceRule = ResourceRule {
    references: &[&["subject"], &["parent"], &["request"]],
    clear: &[],
};

/// Rule row for a known resource type
///
/// # Examples
///
/// ```
/// use fhir_deid::deid::rules::rule_for;
/// use fhir_deid::domain::ResourceType;
///
/// let rule = rule_for(ResourceType::Patient);
/// assert!(rule.clear.contains(&"name"));
/// assert!(rule_for(ResourceType::Practitioner).is_empty());
/// ```
pub fn rule_for(resource_type: ResourceType) -> &'static ResourceRule {
    match resource_type {
        ResourceType::AllergyIntolerance => &ALLERGY_INTOLERANCE,
        ResourceType::Appointment => &APPOINTMENT,
        ResourceType::CarePlan => &CARE_PLAN,
        ResourceType::Claim => &CLAIM,
        ResourceType::ClinicalImpression => &CLINICAL_IMPRESSION,
        ResourceType::Composition => &COMPOSITION,
        ResourceType::Condition => &CONDITION,
        ResourceType::DiagnosticReport => &DIAGNOSTIC_REPORT,
        ResourceType::Encounter => &ENCOUNTER,
        ResourceType::EpisodeOfCare => &EPISODE_OF_CARE,
        ResourceType::HealthcareService => &HEALTHCARE_SERVICE,
        ResourceType::ImagingStudy => &IMAGING_STUDY,
        ResourceType::Immunization => &IMMUNIZATION,
        ResourceType::List => &LIST,
        ResourceType::Location => &LOCATION,
        ResourceType::Media => &MEDIA,
        ResourceType::Medication => &MEDICATION,
        ResourceType::MedicationAdministration => &MEDICATION_ADMINISTRATION,
        ResourceType::MedicationDispense => &MEDICATION_DISPENSE,
        ResourceType::MedicationRequest => &MEDICATION_REQUEST,
        ResourceType::MedicationStatement => &MEDICATION_STATEMENT,
        ResourceType::Observation => &OBSERVATION,
        ResourceType::OperationOutcome => &NO_RULES,
        ResourceType::Organization => &ORGANIZATION,
        ResourceType::Patient => &PATIENT,
        ResourceType::Practitioner => &NO_RULES,
        ResourceType::PractitionerRole => &NO_RULES,
        ResourceType::Procedure => &PROCEDURE,
        ResourceType::QuestionnaireResponse => &QUESTIONNAIRE_RESPONSE,
        ResourceType::RelatedPerson => &RELATED_PERSON,
        ResourceType::ServiceRequest => &SERVICE_REQUEST,
        ResourceType::Specimen => &SPECIMEN,
    }
}

/// Resource types whose rule row is intentionally empty
pub fn identity_only_types() -> Vec<ResourceType> {
    ResourceType::ALL
        .into_iter()
        .filter(|resource_type| rule_for(*resource_type).is_empty())
        .collect()
}

/// Renders a path as `a.b.c` for display
pub fn display_path(path: FieldPath) -> String {
    path.join(".")
}
