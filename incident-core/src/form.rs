use crate::model::{Incident, IncidentStatus, IncidentType, NewIncident};
use validator::Validate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Type,
    Status,
    Reporter,
    Handler,
    Detail,
}

impl Field {
    /// Order in which the form lays the inputs out.
    pub const FORM_ORDER: [Field; 6] = [
        Field::Reporter,
        Field::Title,
        Field::Type,
        Field::Handler,
        Field::Status,
        Field::Detail,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Type => "type",
            Field::Status => "status",
            Field::Reporter => "reporter",
            Field::Handler => "handler",
            Field::Detail => "detail",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Field::Handler)
    }

    /// Title and type are fixed once an incident exists.
    pub fn is_editable(self, mode: &DraftMode) -> bool {
        match mode {
            DraftMode::Create => true,
            DraftMode::Edit { .. } => !matches!(self, Field::Title | Field::Type),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Edit { original: Incident },
}

/// Raw form values, one string per input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Validate)]
pub struct DraftFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Type is required"))]
    pub kind: String,
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
    #[validate(length(min = 1, message = "Reporter is required"))]
    pub reporter: String,
    pub handler: String,
    #[validate(length(min = 1, message = "Detail is required"))]
    pub detail: String,
}

impl DraftFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Type => &self.kind,
            Field::Status => &self.status,
            Field::Reporter => &self.reporter,
            Field::Handler => &self.handler,
            Field::Detail => &self.detail,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Type => &mut self.kind,
            Field::Status => &mut self.status,
            Field::Reporter => &mut self.reporter,
            Field::Handler => &mut self.handler,
            Field::Detail => &mut self.detail,
        }
    }

    /// Required fields left empty, in form order.
    fn missing(&self) -> Vec<Field> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };
        let errors = errors.field_errors();
        let mut missing: Vec<Field> = Field::FORM_ORDER
            .into_iter()
            .filter(|field| {
                let key = match field {
                    Field::Type => "kind",
                    other => other.name(),
                };
                errors.keys().any(|k| {
                    let k: &str = k.as_ref();
                    k == key
                })
            })
            .collect();

        if self.kind.parse::<IncidentType>().is_err() && !missing.contains(&Field::Type) {
            missing.push(Field::Type);
        }
        if self.status.parse::<IncidentStatus>().is_err() && !missing.contains(&Field::Status) {
            missing.push(Field::Status);
        }
        missing
    }
}

/// What a valid draft sends to the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Create(NewIncident),
    Update(Incident),
}

/// In-progress form state; exists only while the modal is open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    pub mode: DraftMode,
    pub fields: DraftFields,
    /// Required fields that were empty on the last submit attempt.
    pub missing: Vec<Field>,
    /// Id of the submit awaiting a reply, if any.
    pub ticket: Option<u64>,
}

impl Draft {
    pub fn blank() -> Self {
        Self {
            mode: DraftMode::Create,
            fields: DraftFields::default(),
            missing: Vec::new(),
            ticket: None,
        }
    }

    pub fn edit(incident: &Incident) -> Self {
        Self {
            fields: DraftFields {
                title: incident.title.clone(),
                kind: incident.kind.as_str().to_string(),
                status: incident.status.as_str().to_string(),
                reporter: incident.reporter.clone(),
                handler: incident.handler.clone().unwrap_or_default(),
                detail: incident.detail.clone(),
            },
            mode: DraftMode::Edit {
                original: incident.clone(),
            },
            missing: Vec::new(),
            ticket: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.ticket.is_some()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, DraftMode::Edit { .. })
    }

    /// Replaces one field. Returns false when the field is locked in the
    /// current mode, in which case nothing changes.
    pub fn set(&mut self, field: Field, value: String) -> bool {
        if !field.is_editable(&self.mode) {
            return false;
        }
        *self.fields.slot(field) = value;
        self.missing.retain(|f| *f != field);
        true
    }

    /// Builds the request body, or the list of fields that block submission.
    pub fn submission(&self) -> Result<Submission, Vec<Field>> {
        let missing = self.fields.missing();
        if !missing.is_empty() {
            return Err(missing);
        }

        let status = self
            .fields
            .status
            .parse::<IncidentStatus>()
            .map_err(|_| vec![Field::Status])?;
        let handler = Some(self.fields.handler.clone()).filter(|h| !h.is_empty());

        match &self.mode {
            DraftMode::Create => {
                let kind = self
                    .fields
                    .kind
                    .parse::<IncidentType>()
                    .map_err(|_| vec![Field::Type])?;
                Ok(Submission::Create(NewIncident {
                    title: self.fields.title.clone(),
                    kind,
                    status,
                    reporter: self.fields.reporter.clone(),
                    handler,
                    detail: self.fields.detail.clone(),
                }))
            }
            DraftMode::Edit { original } => Ok(Submission::Update(Incident {
                status,
                reporter: self.fields.reporter.clone(),
                handler,
                detail: self.fields.detail.clone(),
                ..original.clone()
            })),
        }
    }
}

/// The create/edit dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Open(Draft),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open(_))
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Modal::Open(draft) => Some(draft),
            Modal::Closed => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            Modal::Open(draft) => Some(draft),
            Modal::Closed => None,
        }
    }
}
