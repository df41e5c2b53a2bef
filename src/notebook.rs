//! Links into the Jupyter templates served alongside the diary.
//!
//! Diary fields can offer a menu of notebooks; each entry pairs the template's
//! parameter names with values taken from the selected row.

/// Build `jupyter/{template}?p1=v1&p2=v2`, pairing `params` and `values` positionally.
///
/// Unpaired trailing entries on either side are ignored.
pub fn notebook_link<V: ToString>(template: &str, params: &[&str], values: &[V]) -> String {
    let query = params
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{}={}", name, value.to_string()))
        .collect::<Vec<_>>()
        .join("&");
    format!("jupyter/{}?{}", template, query)
}
