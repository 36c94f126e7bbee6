use super::types::{CategoryChanges, CategoryDraft, CategoryNode};

/// What a form submission will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    /// Create under `parent`, or a new root when `None`.
    Create { parent: Option<CategoryNode> },
    Edit { node: CategoryNode },
}

impl FormTarget {
    /// Whether the target is (or will become) a root, and so takes an image.
    pub fn accepts_image(&self) -> bool {
        match self {
            FormTarget::Create { parent } => parent.is_none(),
            FormTarget::Edit { node } => node.accepts_image(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    Image,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Description => "Description",
            FormField::Image => "Image URL",
        }
    }
}

const ROOT_FIELDS: &[FormField] = &[FormField::Name, FormField::Description, FormField::Image];
const CHILD_FIELDS: &[FormField] = &[FormField::Name, FormField::Description];

/// Field values and focus of an open category form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryForm {
    target: FormTarget,
    name: String,
    description: String,
    image: String,
    focus: FormField,
    error: Option<String>,
}

impl CategoryForm {
    fn new(target: FormTarget) -> Self {
        let (name, description, image) = match &target {
            FormTarget::Create { .. } => Default::default(),
            FormTarget::Edit { node } => (
                node.name.clone(),
                node.description.clone().unwrap_or_default(),
                node.background_image.clone().unwrap_or_default(),
            ),
        };
        Self {
            target,
            name,
            description,
            image,
            focus: FormField::Name,
            error: None,
        }
    }

    pub fn target(&self) -> &FormTarget {
        &self.target
    }

    pub fn title(&self) -> String {
        match &self.target {
            FormTarget::Create { parent: None } => "New root category".to_string(),
            FormTarget::Create {
                parent: Some(parent),
            } => format!("New category under \"{}\"", parent.name),
            FormTarget::Edit { node } => format!("Edit \"{}\"", node.name),
        }
    }

    /// Fields shown for this target, in focus order.
    pub fn fields(&self) -> &'static [FormField] {
        if self.target.accepts_image() {
            ROOT_FIELDS
        } else {
            CHILD_FIELDS
        }
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Description => &self.description,
            FormField::Image => &self.image,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn focus_next(&mut self) {
        self.focus = self.cycle(1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.cycle(self.fields().len() - 1);
    }

    fn cycle(&self, step: usize) -> FormField {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        fields[(pos + step) % fields.len()]
    }

    pub fn insert_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        self.focused_value_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_value_mut().pop();
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Description => &mut self.description,
            FormField::Image => &mut self.image,
        }
    }

    fn submission(&self) -> Submission {
        let accepts_image = self.target.accepts_image();
        match &self.target {
            FormTarget::Create { parent } => Submission::Create {
                parent: parent.clone(),
                draft: CategoryDraft {
                    name: self.name.clone(),
                    description: non_empty(&self.description),
                    image: non_empty(&self.image).filter(|_| accepts_image),
                },
            },
            FormTarget::Edit { node } => Submission::Edit {
                node: node.clone(),
                changes: CategoryChanges {
                    name: changed(&self.name, Some(node.name.as_str())),
                    description: changed(&self.description, node.description.as_deref()),
                    image: changed(&self.image, node.background_image.as_deref())
                        .filter(|_| accepts_image),
                    is_pinned: None,
                },
            },
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `Some(new)` if the trimmed input differs from the current value. An empty
/// input against an existing value means "clear".
fn changed(input: &str, current: Option<&str>) -> Option<String> {
    let input = input.trim();
    (input != current.unwrap_or("").trim()).then(|| input.to_string())
}

/// A dispatched form, handed to the gateway by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create {
        parent: Option<CategoryNode>,
        draft: CategoryDraft,
    },
    Edit {
        node: CategoryNode,
        changes: CategoryChanges,
    },
}

/// Lifecycle of the create/edit modal.
///
/// ```text
/// Closed -> Open -> Submitting -> Closed       (success)
///                   Submitting -> Open + error (failure)
/// ```
///
/// While `Submitting` the form cannot be resubmitted, edited, or cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Closed,
    Open(CategoryForm),
    Submitting(CategoryForm),
}

impl FormState {
    pub fn is_closed(&self) -> bool {
        matches!(self, FormState::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, FormState::Submitting(_))
    }

    /// The form being shown, whatever its phase.
    pub fn form(&self) -> Option<&CategoryForm> {
        match self {
            FormState::Closed => None,
            FormState::Open(form) | FormState::Submitting(form) => Some(form),
        }
    }

    /// The form, only while it accepts input.
    pub fn form_mut(&mut self) -> Option<&mut CategoryForm> {
        match self {
            FormState::Open(form) => Some(form),
            _ => None,
        }
    }

    /// Open a create form. Refused while a submission is in flight.
    pub fn open_create(&mut self, parent: Option<&CategoryNode>) -> bool {
        self.open(FormTarget::Create {
            parent: parent.map(CategoryNode::detached),
        })
    }

    /// Open an edit form prefilled from `node`.
    pub fn open_edit(&mut self, node: &CategoryNode) -> bool {
        self.open(FormTarget::Edit {
            node: node.detached(),
        })
    }

    fn open(&mut self, target: FormTarget) -> bool {
        if self.is_submitting() {
            tracing::debug!("Form busy, not opening another");
            return false;
        }
        *self = FormState::Open(CategoryForm::new(target));
        true
    }

    /// Move to `Submitting` and return what to dispatch.
    ///
    /// Returns `None` when there is no open form, which includes a second
    /// submit while the first is still in flight.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        match std::mem::take(self) {
            FormState::Open(mut form) => {
                form.error = None;
                let submission = form.submission();
                *self = FormState::Submitting(form);
                Some(submission)
            }
            other => {
                if other.is_submitting() {
                    tracing::debug!("Ignoring duplicate form submission");
                }
                *self = other;
                None
            }
        }
    }

    /// The submission failed: reopen the same form with `message`.
    pub fn fail(&mut self, message: impl Into<String>) {
        match std::mem::take(self) {
            FormState::Submitting(mut form) => {
                form.error = Some(message.into());
                *self = FormState::Open(form);
            }
            other => *self = other,
        }
    }

    /// The submission succeeded: close the form.
    pub fn succeed(&mut self) {
        if self.is_submitting() {
            *self = FormState::Closed;
        }
    }

    /// Close an open form. Refused while submitting.
    pub fn cancel(&mut self) -> bool {
        match self {
            FormState::Open(_) => {
                *self = FormState::Closed;
                true
            }
            FormState::Submitting(_) => false,
            FormState::Closed => true,
        }
    }
}
