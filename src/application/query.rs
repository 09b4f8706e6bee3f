//! Search query construction
//!
//! The portal scopes search terms with short field codes (`ttl/widget`,
//! `an/Acme`). [`FieldCode`] enumerates every code the advanced search
//! accepts, so unknown codes are unrepresentable; [`SearchQuery`] collects
//! code/value terms and renders them into the portal's query-string syntax.

/// Portal base URL; detail links on results pages are relative to it.
pub const PORTAL_BASE_URL: &str = "http://patft.uspto.gov";

/// Advanced-search endpoint the first results page is requested from.
pub const SEARCH_RESULTS_BASE_URL: &str = "http://patft.uspto.gov/netacgi/nph-Parser?\
     Sect1=PTO2&Sect2=HITOFF&u=%2Fnetahtml%2FPTO%2Fsearch-adv.htm&r=0&p=1&f=S&l=50&Query=";

/// Endpoint template for subsequent pages; the full query string is
/// re-embedded so pagination needs no server-side session.
pub const NEXT_PAGE_BASE_URL: &str = "http://patft.uspto.gov/netacgi/nph-Parser?\
     Sect1=PTO2&Sect2=HITOFF&u=%2Fnetahtml%2FPTO%2Fsearch-adv.htm&r=0&f=S&l=50&d=PTXT";

/// A search facet the portal can scope a term to.
///
/// Each variant maps 1:1 to a portal query-field code; this is configuration
/// data, not business logic. [`FreeText`](Self::FreeText) is the
/// distinguished code-less term searched across the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldCode {
    /// Free-text term, no field prefix.
    FreeText,
    /// `pn` - patent number.
    PatentNumber,
    /// `isd` - issue date.
    IssueDate,
    /// `ttl` - title.
    Title,
    /// `abst` - abstract.
    Abstract,
    /// `aclm` - claim text.
    Claims,
    /// `spec` - description/specification text.
    Specification,
    /// `ccl` - current US classification.
    CurrentUsClassification,
    /// `cpc` - current CPC classification.
    CpcClassification,
    /// `cpcl` - current CPC classification class.
    CpcClassificationClass,
    /// `icl` - international classification.
    InternationalClassification,
    /// `apn` - application serial number.
    ApplicationSerialNumber,
    /// `apd` - application (filing) date.
    ApplicationDate,
    /// `apt` - application type.
    ApplicationType,
    /// `govt` - government interest.
    GovernmentInterest,
    /// `fmid` - patent family ID.
    FamilyId,
    /// `parn` - parent case information.
    ParentCaseInformation,
    /// `rlap` - related US application data.
    RelatedApplicationData,
    /// `rlfd` - related application filing date.
    RelatedApplicationFilingDate,
    /// `prir` - foreign priority.
    ForeignPriority,
    /// `prad` - priority claims date.
    PriorityClaimsDate,
    /// `pct` - PCT information.
    PctInformation,
    /// `ptad` - PCT filing date.
    PctFilingDate,
    /// `pt3d` - PCT 371 date.
    Pct371Date,
    /// `pppd` - prior published document date.
    PriorPublishedDocumentDate,
    /// `reis` - reissue data.
    ReissueData,
    /// `rpaf` - reissued patent application filed.
    ReissuedApplicationFiled,
    /// `afff` - application filed under 37 CFR 1.47.
    Rule47Filed,
    /// `afft` - 37 CFR 1.47 affirmation flag.
    Rule47Fulfilled,
    /// `in` - inventor name.
    InventorName,
    /// `ic` - inventor city.
    InventorCity,
    /// `is` - inventor state.
    InventorState,
    /// `icn` - inventor country.
    InventorCountry,
    /// `aanm` - applicant name.
    ApplicantName,
    /// `aaci` - applicant city.
    ApplicantCity,
    /// `aast` - applicant state.
    ApplicantState,
    /// `aaco` - applicant country.
    ApplicantCountry,
    /// `aaat` - applicant type.
    ApplicantType,
    /// `lrep` - attorney, agent or firm.
    AttorneyOrAgent,
    /// `an` - assignee name.
    AssigneeName,
    /// `ac` - assignee city.
    AssigneeCity,
    /// `as` - assignee state.
    AssigneeState,
    /// `acn` - assignee country.
    AssigneeCountry,
    /// `exp` - primary examiner.
    PrimaryExaminer,
    /// `exa` - assistant examiner.
    AssistantExaminer,
    /// `ref` - referenced by.
    ReferencedBy,
    /// `fref` - foreign references.
    ForeignReferences,
    /// `oref` - other references.
    OtherReferences,
    /// `cofc` - certificate of correction.
    CertificateOfCorrection,
    /// `reex` - re-examination certificate.
    ReexaminationCertificate,
    /// `ptab` - PTAB trial certificate.
    PtabTrialCertificate,
    /// `sec` - supplemental examination certificate.
    SupplementalExamCertificate,
    /// `ilrn` - international registration number.
    InternationalRegistrationNumber,
    /// `ilrd` - international registration date.
    InternationalRegistrationDate,
    /// `ilpd` - international registration publication date.
    InternationalPublicationDate,
    /// `ilfd` - Hague international filing date.
    HagueFilingDate,
}

impl FieldCode {
    /// The portal's code for this field; empty for the free-text term.
    pub fn code(self) -> &'static str {
        match self {
            Self::FreeText => "",
            Self::PatentNumber => "pn",
            Self::IssueDate => "isd",
            Self::Title => "ttl",
            Self::Abstract => "abst",
            Self::Claims => "aclm",
            Self::Specification => "spec",
            Self::CurrentUsClassification => "ccl",
            Self::CpcClassification => "cpc",
            Self::CpcClassificationClass => "cpcl",
            Self::InternationalClassification => "icl",
            Self::ApplicationSerialNumber => "apn",
            Self::ApplicationDate => "apd",
            Self::ApplicationType => "apt",
            Self::GovernmentInterest => "govt",
            Self::FamilyId => "fmid",
            Self::ParentCaseInformation => "parn",
            Self::RelatedApplicationData => "rlap",
            Self::RelatedApplicationFilingDate => "rlfd",
            Self::ForeignPriority => "prir",
            Self::PriorityClaimsDate => "prad",
            Self::PctInformation => "pct",
            Self::PctFilingDate => "ptad",
            Self::Pct371Date => "pt3d",
            Self::PriorPublishedDocumentDate => "pppd",
            Self::ReissueData => "reis",
            Self::ReissuedApplicationFiled => "rpaf",
            Self::Rule47Filed => "afff",
            Self::Rule47Fulfilled => "afft",
            Self::InventorName => "in",
            Self::InventorCity => "ic",
            Self::InventorState => "is",
            Self::InventorCountry => "icn",
            Self::ApplicantName => "aanm",
            Self::ApplicantCity => "aaci",
            Self::ApplicantState => "aast",
            Self::ApplicantCountry => "aaco",
            Self::ApplicantType => "aaat",
            Self::AttorneyOrAgent => "lrep",
            Self::AssigneeName => "an",
            Self::AssigneeCity => "ac",
            Self::AssigneeState => "as",
            Self::AssigneeCountry => "acn",
            Self::PrimaryExaminer => "exp",
            Self::AssistantExaminer => "exa",
            Self::ReferencedBy => "ref",
            Self::ForeignReferences => "fref",
            Self::OtherReferences => "oref",
            Self::CertificateOfCorrection => "cofc",
            Self::ReexaminationCertificate => "reex",
            Self::PtabTrialCertificate => "ptab",
            Self::SupplementalExamCertificate => "sec",
            Self::InternationalRegistrationNumber => "ilrn",
            Self::InternationalRegistrationDate => "ilrd",
            Self::InternationalPublicationDate => "ilpd",
            Self::HagueFilingDate => "ilfd",
        }
    }

    /// Look up a field by its portal code (case-insensitive). Unknown codes
    /// are rejected here so they can never reach the query string.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        match code.as_str() {
            "pn" => Some(Self::PatentNumber),
            "isd" => Some(Self::IssueDate),
            "ttl" => Some(Self::Title),
            "abst" => Some(Self::Abstract),
            "aclm" => Some(Self::Claims),
            "spec" => Some(Self::Specification),
            "ccl" => Some(Self::CurrentUsClassification),
            "cpc" => Some(Self::CpcClassification),
            "cpcl" => Some(Self::CpcClassificationClass),
            "icl" => Some(Self::InternationalClassification),
            "apn" => Some(Self::ApplicationSerialNumber),
            "apd" => Some(Self::ApplicationDate),
            "apt" => Some(Self::ApplicationType),
            "govt" => Some(Self::GovernmentInterest),
            "fmid" => Some(Self::FamilyId),
            "parn" => Some(Self::ParentCaseInformation),
            "rlap" => Some(Self::RelatedApplicationData),
            "rlfd" => Some(Self::RelatedApplicationFilingDate),
            "prir" => Some(Self::ForeignPriority),
            "prad" => Some(Self::PriorityClaimsDate),
            "pct" => Some(Self::PctInformation),
            "ptad" => Some(Self::PctFilingDate),
            "pt3d" => Some(Self::Pct371Date),
            "pppd" => Some(Self::PriorPublishedDocumentDate),
            "reis" => Some(Self::ReissueData),
            "rpaf" => Some(Self::ReissuedApplicationFiled),
            "afff" => Some(Self::Rule47Filed),
            "afft" => Some(Self::Rule47Fulfilled),
            "in" => Some(Self::InventorName),
            "ic" => Some(Self::InventorCity),
            "is" => Some(Self::InventorState),
            "icn" => Some(Self::InventorCountry),
            "aanm" => Some(Self::ApplicantName),
            "aaci" => Some(Self::ApplicantCity),
            "aast" => Some(Self::ApplicantState),
            "aaco" => Some(Self::ApplicantCountry),
            "aaat" => Some(Self::ApplicantType),
            "lrep" => Some(Self::AttorneyOrAgent),
            "an" => Some(Self::AssigneeName),
            "ac" => Some(Self::AssigneeCity),
            "as" => Some(Self::AssigneeState),
            "acn" => Some(Self::AssigneeCountry),
            "exp" => Some(Self::PrimaryExaminer),
            "exa" => Some(Self::AssistantExaminer),
            "ref" => Some(Self::ReferencedBy),
            "fref" => Some(Self::ForeignReferences),
            "oref" => Some(Self::OtherReferences),
            "cofc" => Some(Self::CertificateOfCorrection),
            "reex" => Some(Self::ReexaminationCertificate),
            "ptab" => Some(Self::PtabTrialCertificate),
            "sec" => Some(Self::SupplementalExamCertificate),
            "ilrn" => Some(Self::InternationalRegistrationNumber),
            "ilrd" => Some(Self::InternationalRegistrationDate),
            "ilpd" => Some(Self::InternationalPublicationDate),
            "ilfd" => Some(Self::HagueFilingDate),
            _ => None,
        }
    }
}

/// An immutable-once-built mapping from field code to search value, combined
/// with AND semantics into one query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<(FieldCode, String)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term; setting the same field twice replaces the earlier value.
    #[must_use]
    pub fn field(mut self, code: FieldCode, value: impl Into<String>) -> Self {
        let value = value.into();
        if let Some(slot) = self.terms.iter_mut().find(|(c, _)| *c == code) {
            slot.1 = value;
        } else {
            self.terms.push((code, value));
        }
        self
    }

    /// Add the code-less free-text term.
    #[must_use]
    pub fn free_text(self, value: impl Into<String>) -> Self {
        self.field(FieldCode::FreeText, value)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Render the portal query string: terms joined with `" AND "`, spaces
    /// inside values as `-`, then every remaining space as `+` and every
    /// slash percent-encoded. An empty query degrades to the portal's
    /// default most-recent listing.
    pub fn to_query_string(&self) -> String {
        let joined = self
            .terms
            .iter()
            .map(|(code, value)| {
                let value = value.replace(' ', "-");
                if code.code().is_empty() {
                    value
                } else {
                    format!("{}/{}", code.code(), value)
                }
            })
            .collect::<Vec<_>>()
            .join(" AND ");
        joined.replace(' ', "+").replace('/', "%2F")
    }

    /// URL of the first results page for this query.
    pub fn first_page_url(&self) -> String {
        format!("{SEARCH_RESULTS_BASE_URL}{}&d=PTXT", self.to_query_string())
    }

    /// URL of a subsequent results page. `list_index` starts at 2 for the
    /// second page; the query string and total count are re-embedded so the
    /// portal can continue the listing without a session.
    pub fn next_page_url(&self, total_results: u64, list_index: u32) -> String {
        let query = self.to_query_string();
        format!(
            "{NEXT_PAGE_BASE_URL}&OS={query}&RS={query}&Query={query}\
             &TD={total_results}&Srch1={query}&NextList{list_index}=Next+50+Hits"
        )
    }
}
