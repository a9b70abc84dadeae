// Column template catalog - Key to (title, value) resolver registry
use crate::application::device_directory::DirectoryError;
use crate::application::report_context::ReportContext;
use crate::application::templates;
use crate::domain::cell::ColumnValue;
use crate::domain::event::EventRecord;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a value resolver could not produce a cell. The assembler turns any of
/// these into a blank-filler cell.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("{0} is not available")]
    Unavailable(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("column key '{0}' is registered twice")]
    DuplicateKey(String),

    #[error("column key '{0}' must be non-empty and contain only [A-Za-z0-9_]")]
    InvalidKey(String),
}

pub type TitleFn = dyn Fn(&ReportContext, &str) -> String + Send + Sync;
pub type ValueFn<R> =
    dyn Fn(usize, &ReportContext, &str, &R) -> Result<ColumnValue, ResolveError> + Send + Sync;

pub struct ColumnTemplate<R: ?Sized> {
    key: String,
    title: Box<TitleFn>,
    value: Box<ValueFn<R>>,
}

impl<R: ?Sized> ColumnTemplate<R> {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self, ctx: &ReportContext, arg: &str) -> String {
        (self.title)(ctx, arg)
    }

    pub fn value(
        &self,
        row: usize,
        ctx: &ReportContext,
        arg: &str,
        record: &R,
    ) -> Result<ColumnValue, ResolveError> {
        (self.value)(row, ctx, arg, record)
    }
}

/// Immutable after [`ColumnCatalogBuilder::build`].
pub struct ColumnCatalog<R: ?Sized> {
    templates: HashMap<String, ColumnTemplate<R>>,
    order: Vec<String>,
}

impl<R: ?Sized> ColumnCatalog<R> {
    pub fn builder() -> ColumnCatalogBuilder<R> {
        ColumnCatalogBuilder::default()
    }

    pub fn lookup(&self, key: &str) -> Option<&ColumnTemplate<R>> {
        self.templates.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// Keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

pub struct ColumnCatalogBuilder<R: ?Sized> {
    templates: HashMap<String, ColumnTemplate<R>>,
    order: Vec<String>,
}

impl<R: ?Sized> Default for ColumnCatalogBuilder<R> {
    fn default() -> Self {
        Self {
            templates: HashMap::new(),
            order: Vec::new(),
        }
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl<R: ?Sized> ColumnCatalogBuilder<R> {
    pub fn register<T, V>(&mut self, key: &str, title: T, value: V) -> Result<&mut Self, CatalogError>
    where
        T: Fn(&ReportContext, &str) -> String + Send + Sync + 'static,
        V: Fn(usize, &ReportContext, &str, &R) -> Result<ColumnValue, ResolveError>
            + Send
            + Sync
            + 'static,
    {
        if !is_valid_key(key) {
            return Err(CatalogError::InvalidKey(key.to_string()));
        }
        if self.templates.contains_key(key) {
            return Err(CatalogError::DuplicateKey(key.to_string()));
        }
        self.templates.insert(
            key.to_string(),
            ColumnTemplate {
                key: key.to_string(),
                title: Box::new(title),
                value: Box::new(value),
            },
        );
        self.order.push(key.to_string());
        Ok(self)
    }

    pub fn build(self) -> ColumnCatalog<R> {
        ColumnCatalog {
            templates: self.templates,
            order: self.order,
        }
    }
}

static EVENT_CATALOG: OnceLock<ColumnCatalog<dyn EventRecord>> = OnceLock::new();

/// The built-in event column catalog, built on first use and shared afterwards.
///
/// # Panics
/// When the built-in registrations are inconsistent (duplicate or malformed
/// key). That is a programming error and shows up on the first report.
pub fn event_catalog() -> &'static ColumnCatalog<dyn EventRecord> {
    EVENT_CATALOG.get_or_init(|| match templates::build_event_catalog() {
        Ok(catalog) => {
            tracing::debug!("Built event column catalog with {} templates", catalog.len());
            catalog
        }
        Err(e) => panic!("built-in event column catalog is misconfigured: {e}"),
    })
}
