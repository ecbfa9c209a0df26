use thiserror::Error;

/// Configuration errors in layout definitions.
///
/// All of these are programming or deployment mistakes, never runtime data
/// problems. Callers surface them as internal errors.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("No layout sets defined")]
    NoLayoutSets,

    #[error("Layout set '{id}' not found")]
    UnknownLayoutSet { id: String },

    #[error("Layout set '{id}' is defined more than once")]
    DuplicateLayoutSet { id: String },

    #[error("Layout set '{id}' has no pages")]
    EmptyLayoutSet { id: String },

    #[error("Unknown page '{page}' in layout set '{layout_set}'")]
    UnknownPage { layout_set: String, page: String },

    #[error("Page '{page}' is defined more than once in layout set '{layout_set}'")]
    DuplicatePage { layout_set: String, page: String },

    #[error("Unknown component {component_id} on {page}")]
    ComponentNotFound { page: String, component_id: String },

    #[error("Component '{component_id}' is defined more than once on page '{page}'")]
    DuplicateComponent { page: String, component_id: String },

    #[error("Component '{parent}' on page '{page}' references unknown child '{child}'")]
    UnknownChild {
        page: String,
        parent: String,
        child: String,
    },

    #[error("Component '{child}' on page '{page}' is a child of both '{first_parent}' and '{second_parent}'")]
    ChildClaimedTwice {
        page: String,
        child: String,
        first_parent: String,
        second_parent: String,
    },

    #[error("Component '{component_id}' on page '{page}' is unreachable from the page root (cyclic children?)")]
    UnreachableComponent { page: String, component_id: String },

    #[error("Subform '{component_id}' on page '{page}' has no layoutSet")]
    MissingLayoutSetReference { page: String, component_id: String },

    #[error("Invalid component '{component_id}' on page '{page}': {message}")]
    InvalidComponent {
        page: String,
        component_id: String,
        message: String,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type LayoutResult<T> = Result<T, LayoutError>;
