//! The immutable attribute-to-route map at the heart of dispatch.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

use crate::route::Route;
use crate::router::binding::Binding;

/// Errors detected while constructing a [`RoutingTree`].
///
/// These are programmer errors in the dispatch expression and fail fast,
/// before any request is made.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Two or more concrete bindings share an attribute value. Every
    /// offending value is enumerated.
    #[error("duplicate attribute values: {}", .keys.join(", "))]
    DuplicateAttributeValue {
        /// The repeated attribute values, rendered for diagnostics.
        keys: Vec<String>,
    },

    /// More than one wildcard binding was supplied.
    #[error("multiple wildcard bindings")]
    MultipleWildcards,
}

/// An immutable map from attribute values to routes, with one optional
/// wildcard fallback.
///
/// Construction freezes the map; lookups are read-only and safe for
/// concurrent use, so a tree is typically built once per dispatch expression
/// and reused for the lifetime of the caller.
pub struct RoutingTree<A, T = ()> {
    routes: HashMap<A, Route<T>>,
    wildcard: Option<Route<T>>,
}

impl<A, T> RoutingTree<A, T>
where
    A: Eq + Hash,
{
    /// Builds a tree from `bindings`.
    ///
    /// Fails with [`TreeError::DuplicateAttributeValue`] when a concrete
    /// attribute value repeats, and with [`TreeError::MultipleWildcards`]
    /// when more than one wildcard binding appears. An empty binding list
    /// builds a tree that never matches.
    pub fn new<I>(bindings: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = Binding<A, T>>,
        A: Debug,
    {
        let mut routes = HashMap::new();
        let mut wildcard = None;
        let mut wildcards = 0usize;
        let mut duplicates = Vec::new();

        for binding in bindings {
            let (key, route) = binding.into_parts();
            match key {
                Some(attribute) => {
                    if routes.contains_key(&attribute) {
                        let rendered = format!("{:?}", attribute);
                        if !duplicates.contains(&rendered) {
                            duplicates.push(rendered);
                        }
                    } else {
                        routes.insert(attribute, route);
                    }
                }
                None => {
                    wildcards += 1;
                    wildcard = Some(route);
                }
            }
        }

        if !duplicates.is_empty() {
            return Err(TreeError::DuplicateAttributeValue { keys: duplicates });
        }

        if wildcards > 1 {
            return Err(TreeError::MultipleWildcards);
        }

        Ok(RoutingTree { routes, wildcard })
    }

    /// Returns the route bound to exactly `attribute`, without falling
    /// through to the wildcard.
    pub fn find(&self, attribute: &A) -> Option<&Route<T>> {
        self.routes.get(attribute)
    }

    /// Returns the wildcard route, if one was bound.
    pub fn wildcard(&self) -> Option<&Route<T>> {
        self.wildcard.as_ref()
    }

    /// Returns the route bound to `attribute`, or the wildcard when no
    /// concrete binding matches, or `None` when neither exists.
    pub fn lookup(&self, attribute: &A) -> Option<&Route<T>> {
        self.find(attribute).or_else(|| self.wildcard())
    }

    /// The number of concrete bindings in the tree.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// `true` when the tree holds neither concrete bindings nor a wildcard.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.wildcard.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::binding;

    fn tree<A>(bindings: Vec<Binding<A, ()>>) -> Result<RoutingTree<A, ()>, TreeError>
    where
        A: Eq + Hash + Debug,
    {
        RoutingTree::new(bindings)
    }

    #[test]
    fn rejects_duplicate_attribute_values() {
        let xml: mime::Mime = "application/xml".parse().unwrap();

        let result = tree(vec![
            binding::on(mime::APPLICATION_JSON).to(Route::pass()),
            binding::on(mime::APPLICATION_JSON).to(Route::pass()),
            binding::on(xml.clone()).to(Route::pass()),
            binding::on(xml).to(Route::pass()),
        ]);

        let error = result.err().expect("duplicates must be rejected");
        let message = error.to_string();
        assert!(message.contains("application/json"), "{}", message);
        assert!(message.contains("application/xml"), "{}", message);
    }

    #[test]
    fn rejects_multiple_wildcards() {
        let result = tree::<u16>(vec![
            binding::any().to(Route::pass()),
            binding::any().to(Route::pass()),
        ]);

        assert!(matches!(result, Err(TreeError::MultipleWildcards)));
    }

    #[test]
    fn duplicates_take_precedence_over_wildcard_errors() {
        let result = tree(vec![
            binding::on(200u16).to(Route::pass()),
            binding::on(200u16).to(Route::pass()),
            binding::any().to(Route::pass()),
            binding::any().to(Route::pass()),
        ]);

        assert!(matches!(
            result,
            Err(TreeError::DuplicateAttributeValue { .. })
        ));
    }

    #[test]
    fn lookup_prefers_concrete_bindings() {
        let tree = tree(vec![
            binding::on(200u16).to(Route::pass()),
            binding::any().to(Route::pass()),
        ])
        .unwrap();

        assert!(tree.find(&200).is_some());
        assert!(tree.find(&404).is_none());
        assert!(tree.lookup(&404).is_some(), "must fall through to wildcard");
    }

    #[test]
    fn lookup_is_absent_without_wildcard() {
        let tree = tree(vec![binding::on(200u16).to(Route::pass())]).unwrap();

        assert!(tree.lookup(&404).is_none());
    }

    #[test]
    fn empty_tree_never_matches() {
        let tree = tree::<u16>(vec![]).unwrap();

        assert!(tree.is_empty());
        assert!(tree.lookup(&200).is_none());
    }
}
