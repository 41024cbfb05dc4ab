//! Response dispatch: the glue between navigators, routing trees and routes.

pub mod binding;
pub mod navigator;
pub mod tree;

use std::fmt::Debug;
use std::hash::Hash;
use std::pin::Pin;

use futures_util::future;
use hyper::{Body, Response};
use log::trace;

use crate::error::Error;
use crate::route::{Route, RouteFuture};
use self::binding::Binding;
use self::navigator::Navigator;
use self::tree::{RoutingTree, TreeError};

/// Pairs a [`Navigator`] with a [`RoutingTree`] and feeds responses to the
/// selected route.
///
/// The dispatcher is transparent: it never inspects what the route produces.
/// Exactly one route runs per successful dispatch; when selection fails no
/// route runs at all and the future fails with [`Error::NoRouteMatched`].
pub struct Dispatcher<N, A, T = ()> {
    navigator: N,
    tree: RoutingTree<A, T>,
}

impl<N, A, T> Dispatcher<N, A, T>
where
    N: Navigator<A>,
    A: Eq + Hash + Debug,
    T: Send + 'static,
{
    /// Creates a dispatcher over an already-built tree.
    pub fn new(navigator: N, tree: RoutingTree<A, T>) -> Self {
        Dispatcher { navigator, tree }
    }

    /// Extracts the attribute from `response`, selects a route and invokes
    /// it, returning the route's future.
    pub fn dispatch(&self, response: Response<Body>) -> Pin<Box<RouteFuture<T>>> {
        let attribute = self.navigator.extract(&response);

        match self.navigator.select(attribute.as_ref(), &self.tree) {
            Some(route) => {
                trace!("dispatching response on attribute {:?}", attribute);
                route.execute(response)
            }
            None => {
                trace!("no route matched attribute {:?}", attribute);
                let attribute = attribute.map(|a| format!("{:?}", a));
                Box::pin(future::err(Error::NoRouteMatched { attribute }))
            }
        }
    }
}

/// Builds a routing tree from `bindings` and returns a route that performs
/// navigation when invoked on a response.
///
/// Tree construction happens eagerly, so a malformed binding set fails the
/// dispatch expression synchronously instead of surfacing per request.
pub fn dispatch<N, A, T, I>(navigator: N, bindings: I) -> Result<Route<T>, TreeError>
where
    N: Navigator<A> + Send + Sync + 'static,
    A: Eq + Hash + Debug + Send + Sync + 'static,
    T: Send + 'static,
    I: IntoIterator<Item = Binding<A, T>>,
{
    let dispatcher = Dispatcher::new(navigator, RoutingTree::new(bindings)?);
    Ok(Route::new(move |response| dispatcher.dispatch(response)))
}
