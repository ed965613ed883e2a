//! Permission catalog
//!
//! Maps the permission names used by API handlers (`read.Employee`) to
//! every persisted spelling that satisfies them (`read.Employee`,
//! `read.employee`, `read.employee-data`).  Subjects were renamed over
//! time and persisted policies carry all of the historical forms.

use sndcore::ac::permission::Action;
use std::collections::HashMap;

/// API subject and the persisted spellings of that subject.  Every
/// entry here is expanded for the base actions below.
const SUBJECTS: &[(&str, &[&str])] = &[
    ("User", &["User", "user"]),
    ("Dashboard", &["Dashboard", "dashboard"]),
    ("Employee", &["Employee", "employee", "employee-data"]),
    ("Customer", &["Customer", "customer"]),
    ("Equipment", &["Equipment", "equipment"]),
    ("Project", &["Project", "project"]),
    ("Rental", &["Rental", "rental"]),
    ("Quotation", &["Quotation", "quotation"]),
    ("Payroll", &["Payroll", "payroll"]),
    ("Timesheet", &["Timesheet", "timesheet"]),
    ("Leave", &["Leave", "leave"]),
    ("Department", &["Department", "department"]),
    ("Designation", &["Designation", "designation"]),
    ("Company", &["company"]),
    ("Settings", &["Settings", "settings", "system-setting"]),
    ("Location", &["Location", "location"]),
    ("Maintenance", &["Maintenance", "maintenance"]),
    ("Safety", &["Safety", "safety"]),
    ("SalaryIncrement", &["SalaryIncrement", "salaryincrement"]),
    ("Advance", &["Advance", "advance"]),
    ("AdvancePayment", &["AdvancePayment", "advancepayment", "advance"]),
    ("Assignment", &["Assignment", "assignment"]),
    ("Report", &["Report", "report"]),
    ("employee-document", &["employee-document"]),
    ("Document", &["Document", "document"]),
    ("document-version", &["document-version"]),
    ("document-approval", &["document-approval"]),
];

const BASE_ACTIONS: [Action; 5] = [
    Action::Read,
    Action::Create,
    Action::Update,
    Action::Delete,
    Action::Manage,
];

/// Entries outside of the base actions.
const EXTRA: &[(&str, &[&str])] = &[
    ("approve.Timesheet", &["approve.Timesheet", "approve.timesheet"]),
    ("reject.Timesheet", &["reject.Timesheet", "reject.timesheet"]),
    // stage specific approvals only exist in the lower case form
    ("approve.Timesheet.Foreman", &["approve.timesheet.foreman"]),
    ("approve.Timesheet.Incharge", &["approve.timesheet.incharge"]),
    ("approve.Timesheet.Checking", &["approve.timesheet.checking"]),
    ("approve.Timesheet.Manager", &["approve.timesheet.manager"]),
    ("export.Report", &["export.Report", "export.report"]),
    ("approve.Document", &["approve.Document", "approve.document"]),
    ("reject.Document", &["reject.Document", "reject.document"]),
    ("approve.document-approval", &["approve.document-approval"]),
    ("reject.document-approval", &["reject.document-approval"]),
    ("*", &["*"]),
    ("manage.all", &["manage.all"]),
];

/// Static lookup from API permission names to persisted names.  Built
/// once and never mutated.
#[derive(Clone, Debug)]
pub struct Catalog(HashMap<String, Vec<String>>);

impl Default for Catalog {
    fn default() -> Self {
        let base = SUBJECTS.iter()
            .flat_map(|(subject, spellings)| {
                BASE_ACTIONS.iter().map(move |action| (
                    format!("{action}.{subject}"),
                    spellings.iter()
                        .map(|spelling| format!("{action}.{spelling}"))
                        .collect::<Vec<_>>(),
                ))
            });
        let extra = EXTRA.iter()
            .map(|(name, persisted)| (
                name.to_string(),
                persisted.iter().map(|s| s.to_string()).collect(),
            ));
        Self::from_iter(base.chain(extra))
    }
}

impl FromIterator<(String, Vec<String>)> for Catalog {
    /// Entries with an empty expansion are dropped, so every lookup
    /// yields at least one name.
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter()
            .filter(|(_, persisted)| !persisted.is_empty())
            .collect())
    }
}

impl Catalog {
    /// The persisted names that satisfy `name`; never empty.  Names
    /// absent from the catalog expand to themselves so uncataloged
    /// permissions can still be checked literally.
    pub fn expand<'a>(&'a self, name: &'a str) -> Vec<&'a str> {
        match self.0.get(name) {
            Some(persisted) => persisted.iter().map(String::as_str).collect(),
            None => vec![name],
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
