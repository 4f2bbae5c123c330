//! Column descriptors and the permission-gated row actions column.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::grid::permissions::PermissionChecker;

/// Field name of the synthesized actions column.
pub const ACTIONS_FIELD: &str = "actions";

/// A row type shown in a grid.
pub trait GridRow {
    type Id: Clone + Send + Sync + 'static;

    fn row_id(&self) -> Self::Id;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    SingleSelect { options: Vec<String> },
    Actions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridColumn {
    pub field: String,
    pub header_name: String,
    pub kind: ColumnKind,
    pub filterable: bool,
    pub sortable: bool,
}

impl GridColumn {
    pub fn new(field: impl Into<String>, header_name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            field: field.into(),
            header_name: header_name.into(),
            kind,
            filterable: true,
            sortable: true,
        }
    }

    pub fn text(field: impl Into<String>, header_name: impl Into<String>) -> Self {
        Self::new(field, header_name, ColumnKind::Text)
    }

    pub fn number(field: impl Into<String>, header_name: impl Into<String>) -> Self {
        Self::new(field, header_name, ColumnKind::Number)
    }

    pub fn is_actions(&self) -> bool {
        self.kind == ColumnKind::Actions
    }
}

/// Which base columns get a capability: all, none, or a named subset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ColumnCapability {
    #[default]
    All,
    Disabled,
    Only(Vec<String>),
}

impl ColumnCapability {
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(fields.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, field: &str) -> bool {
        match self {
            ColumnCapability::All => true,
            ColumnCapability::Disabled => false,
            ColumnCapability::Only(fields) => fields.iter().any(|f| f == field),
        }
    }
}

impl From<bool> for ColumnCapability {
    fn from(enabled: bool) -> Self {
        if enabled {
            ColumnCapability::All
        } else {
            ColumnCapability::Disabled
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowActionKind {
    Show,
    Edit,
    Delete,
}

impl RowActionKind {
    pub const fn label(self) -> &'static str {
        match self {
            RowActionKind::Show => "show",
            RowActionKind::Edit => "edit",
            RowActionKind::Delete => "delete",
        }
    }
}

pub type RowHook<Id> = Arc<dyn Fn(&Id) + Send + Sync>;

/// A row operation and the permissions that unlock it.
pub struct RowAction<Id> {
    permissions: Vec<String>,
    hook: RowHook<Id>,
}

impl<Id> RowAction<Id> {
    pub fn new<I, S>(permissions: I, hook: impl Fn(&Id) + Send + Sync + 'static) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            hook: Arc::new(hook),
        }
    }

    /// An action available to everyone.
    pub fn always(hook: impl Fn(&Id) + Send + Sync + 'static) -> Self {
        Self::new(Vec::<String>::new(), hook)
    }

    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }
}

impl<Id> Clone for RowAction<Id> {
    fn clone(&self) -> Self {
        Self {
            permissions: self.permissions.clone(),
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<Id> Debug for RowAction<Id> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

/// Click on a grid cell; row handlers only see it if nobody stopped it.
#[derive(Debug, Default)]
pub struct ClickEvent {
    propagation_stopped: bool,
}

impl ClickEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// A rendered action button bound to one row.
pub struct ActionButton<Id> {
    pub kind: RowActionKind,
    pub row_id: Id,
    hook: RowHook<Id>,
}

impl<Id> ActionButton<Id> {
    /// Runs the action and keeps the click from reaching the row.
    pub fn click(&self, event: &mut ClickEvent) {
        event.stop_propagation();
        (self.hook)(&self.row_id);
    }
}

impl<Id: Debug> Debug for ActionButton<Id> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionButton")
            .field("kind", &self.kind)
            .field("row_id", &self.row_id)
            .finish_non_exhaustive()
    }
}

/// Builds a grid's column set from base columns and optional row actions.
pub struct ActionColumnBuilder<T: GridRow> {
    columns: Vec<GridColumn>,
    filterable: ColumnCapability,
    sortable: ColumnCapability,
    show: Option<RowAction<T::Id>>,
    edit: Option<RowAction<T::Id>>,
    delete: Option<RowAction<T::Id>>,
}

impl<T: GridRow> ActionColumnBuilder<T> {
    pub fn new(columns: Vec<GridColumn>) -> Self {
        Self {
            columns,
            filterable: ColumnCapability::All,
            sortable: ColumnCapability::All,
            show: None,
            edit: None,
            delete: None,
        }
    }

    pub fn filterable(mut self, capability: impl Into<ColumnCapability>) -> Self {
        self.filterable = capability.into();
        self
    }

    pub fn sortable(mut self, capability: impl Into<ColumnCapability>) -> Self {
        self.sortable = capability.into();
        self
    }

    pub fn on_show(mut self, action: RowAction<T::Id>) -> Self {
        self.show = Some(action);
        self
    }

    pub fn on_edit(mut self, action: RowAction<T::Id>) -> Self {
        self.edit = Some(action);
        self
    }

    pub fn on_delete(mut self, action: RowAction<T::Id>) -> Self {
        self.delete = Some(action);
        self
    }

    pub fn build(self) -> GridColumns<T> {
        let mut columns: Vec<GridColumn> = self
            .columns
            .into_iter()
            .map(|mut column| {
                column.filterable = self.filterable.allows(&column.field);
                column.sortable = self.sortable.allows(&column.field);
                column
            })
            .collect();

        let actions: Vec<_> = [
            (RowActionKind::Show, self.show),
            (RowActionKind::Edit, self.edit),
            (RowActionKind::Delete, self.delete),
        ]
        .into_iter()
        .filter_map(|(kind, action)| action.map(|action| (kind, action)))
        .collect();

        if !actions.is_empty() {
            columns.push(GridColumn {
                field: ACTIONS_FIELD.to_string(),
                header_name: String::new(),
                kind: ColumnKind::Actions,
                filterable: false,
                sortable: false,
            });
        }

        GridColumns { columns, actions }
    }
}

/// Columns of a grid plus the row actions behind its actions column.
pub struct GridColumns<T: GridRow> {
    columns: Vec<GridColumn>,
    actions: Vec<(RowActionKind, RowAction<T::Id>)>,
}

impl<T: GridRow> GridColumns<T> {
    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    pub fn column(&self, field: &str) -> Option<&GridColumn> {
        self.columns.iter().find(|column| column.field == field)
    }

    pub fn has_actions_column(&self) -> bool {
        self.columns.iter().any(GridColumn::is_actions)
    }

    /// Buttons rendered for `row` given the caller's permissions.
    pub fn row_actions<P>(&self, row: &T, permissions: &P) -> Vec<ActionButton<T::Id>>
    where
        P: PermissionChecker + ?Sized,
    {
        let row_id = row.row_id();
        self.actions
            .iter()
            .filter(|(_, action)| permissions.has_permission(action.permissions()))
            .map(|(kind, action)| ActionButton {
                kind: *kind,
                row_id: row_id.clone(),
                hook: Arc::clone(&action.hook),
            })
            .collect()
    }

    /// Hands the click to the row handler unless an action button stopped it.
    pub fn dispatch_row_click(
        &self,
        row: &T,
        event: &ClickEvent,
        on_row_click: impl FnOnce(&T::Id),
    ) -> bool {
        if event.is_propagation_stopped() {
            return false;
        }
        on_row_click(&row.row_id());
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::grid::permissions::PermissionSet;

    struct Row(u32);

    impl GridRow for Row {
        type Id = u32;

        fn row_id(&self) -> u32 {
            self.0
        }
    }

    fn base_columns() -> Vec<GridColumn> {
        vec![
            GridColumn::text("name", "Name"),
            GridColumn::number("price", "Price"),
            GridColumn::new(
                "category",
                "Category",
                ColumnKind::SingleSelect {
                    options: vec!["soap".into(), "candles".into()],
                },
            ),
        ]
    }

    #[test]
    fn no_actions_means_no_actions_column() {
        let columns = ActionColumnBuilder::<Row>::new(base_columns()).build();

        assert!(!columns.has_actions_column());
        assert_eq!(columns.columns().len(), 3);
        assert!(columns.row_actions(&Row(1), &PermissionSet::default()).is_empty());
    }

    #[test]
    fn show_without_permission_renders_no_button() {
        let columns = ActionColumnBuilder::<Row>::new(base_columns())
            .on_show(RowAction::new(["products.view"], |_: &u32| {}))
            .build();

        assert!(columns.has_actions_column());
        let column = columns.column(ACTIONS_FIELD).unwrap();
        assert!(!column.filterable && !column.sortable);

        let buttons = columns.row_actions(&Row(1), &PermissionSet::new(["orders.view"]));
        assert!(buttons.is_empty());

        let buttons = columns.row_actions(&Row(1), &PermissionSet::new(["products.view"]));
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].kind, RowActionKind::Show);
    }

    #[test]
    fn actions_without_permissions_are_always_shown() {
        let columns = ActionColumnBuilder::<Row>::new(base_columns())
            .on_edit(RowAction::always(|_: &u32| {}))
            .on_delete(RowAction::new(["products.delete"], |_: &u32| {}))
            .build();

        let kinds: Vec<_> = columns
            .row_actions(&Row(3), &PermissionSet::default())
            .into_iter()
            .map(|button| button.kind)
            .collect();

        assert_eq!(kinds, vec![RowActionKind::Edit]);
    }

    #[test]
    fn button_click_does_not_reach_row_handler() {
        let clicked = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&clicked);
        let columns = ActionColumnBuilder::<Row>::new(base_columns())
            .on_delete(RowAction::always(move |id: &u32| sink.lock().unwrap().push(*id)))
            .build();
        let row = Row(42);

        let mut event = ClickEvent::new();
        let buttons = columns.row_actions(&row, &PermissionSet::default());
        buttons[0].click(&mut event);
        let mut row_clicks = 0;
        let dispatched = columns.dispatch_row_click(&row, &event, |_| row_clicks += 1);

        assert_eq!(*clicked.lock().unwrap(), vec![42]);
        assert!(!dispatched);
        assert_eq!(row_clicks, 0);

        let plain = ClickEvent::new();
        assert!(columns.dispatch_row_click(&row, &plain, |id| assert_eq!(*id, 42)));
    }

    #[test]
    fn capabilities_follow_allow_lists_and_booleans() {
        let columns = ActionColumnBuilder::<Row>::new(base_columns())
            .filterable(ColumnCapability::only(["name", "category"]))
            .sortable(false)
            .build();

        let flags: Vec<_> = columns
            .columns()
            .iter()
            .map(|column| (column.field.as_str(), column.filterable, column.sortable))
            .collect();

        assert_eq!(
            flags,
            vec![
                ("name", true, false),
                ("price", false, false),
                ("category", true, false),
            ]
        );
    }
}
