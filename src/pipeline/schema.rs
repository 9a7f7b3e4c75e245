//! Typed feature schema and the naming rules of every derived column.
//!
//! The schema is built once by the expander and then only read: downstream
//! stages take the derived column names from here instead of rebuilding them
//! from strings.

/// Derived feature columns produced from one source column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGroup {
    /// Name of the encoded source column, e.g. `features`.
    pub source: String,
    /// Leading token shared by every cell of the source column.
    pub code: String,
    /// `feature_<code>_0 .. feature_<code>_(k-1)`, in value order.
    pub derived_columns: Vec<String>,
}

impl FeatureGroup {
    pub fn new(source: impl Into<String>, code: impl Into<String>, k: usize) -> Self {
        let code = code.into();
        let derived_columns = (0..k).map(|i| feature_column_name(&code, i)).collect();
        Self {
            source: source.into(),
            code,
            derived_columns,
        }
    }

    /// Number of encoded values per row.
    pub fn width(&self) -> usize {
        self.derived_columns.len()
    }

    /// `max_feature_<code>_index`
    pub fn max_index_column(&self) -> String {
        format!("max_feature_{}_index", self.code)
    }

    /// `max_feature_<code>_abs_mean_diff`
    pub fn abs_mean_diff_column(&self) -> String {
        format!("max_feature_{}_abs_mean_diff", self.code)
    }
}

/// `feature_<code>_<index>`
pub fn feature_column_name(code: &str, index: usize) -> String {
    format!("feature_{code}_{index}")
}

/// One [`FeatureGroup`] per source column, in the order the source columns
/// were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSchema {
    groups: Vec<FeatureGroup>,
}

impl FeatureSchema {
    pub fn new(groups: Vec<FeatureGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    /// Look up the group built from `source`.
    pub fn group(&self, source: &str) -> Option<&FeatureGroup> {
        self.groups.iter().find(|g| g.source == source)
    }

    /// Every derived feature column across all groups.
    pub fn derived_columns(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.derived_columns.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_names_follow_code() {
        let group = FeatureGroup::new("features", "100", 3);
        assert_eq!(
            group.derived_columns,
            ["feature_100_0", "feature_100_1", "feature_100_2"]
        );
        assert_eq!(group.width(), 3);
        assert_eq!(group.max_index_column(), "max_feature_100_index");
        assert_eq!(group.abs_mean_diff_column(), "max_feature_100_abs_mean_diff");
    }

    #[test]
    fn schema_lists_derived_columns_in_group_order() {
        let schema = FeatureSchema::new(vec![
            FeatureGroup::new("a", "1", 2),
            FeatureGroup::new("b", "2", 1),
        ]);
        let all: Vec<_> = schema.derived_columns().collect();
        assert_eq!(all, ["feature_1_0", "feature_1_1", "feature_2_0"]);
        assert_eq!(schema.group("b").map(|g| g.code.as_str()), Some("2"));
        assert!(schema.group("c").is_none());
    }
}
