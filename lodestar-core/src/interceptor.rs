//! Interceptor - Hooks run around a resource operation
//!
//! Ordering contract:
//!
//! - `before` hooks run in registration order
//! - the operation runs only if no `before` hook recorded an error
//! - `after` hooks run in reverse registration order, and only if the
//!   operation succeeded
//!
//! The first error diagnostic recorded by a hook or the operation stops the
//! chain; nothing after it runs.

use crate::diagnostics::Diagnostics;

/// A hook around an operation on call data `C`
pub trait Interceptor<C>: Send + Sync {
    /// Name used in log output
    fn name(&self) -> &'static str;

    fn before(&self, _call: &mut C, _diags: &mut Diagnostics) {}

    fn after(&self, _call: &mut C, _diags: &mut Diagnostics) {}
}

/// Ordered list of interceptors
pub struct Interceptors<C> {
    interceptors: Vec<Box<dyn Interceptor<C>>>,
}

impl<C> Default for Interceptors<C> {
    fn default() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }
}

impl<C> Interceptors<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, interceptor: impl Interceptor<C> + 'static) {
        self.interceptors.push(Box::new(interceptor));
    }

    pub fn with(mut self, interceptor: impl Interceptor<C> + 'static) -> Self {
        self.push(interceptor);
        self
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Run `operation` wrapped by every interceptor
    pub fn run<F>(&self, call: &mut C, operation: F) -> Diagnostics
    where
        F: FnOnce(&mut C, &mut Diagnostics),
    {
        let mut diags = Diagnostics::new();

        if !self.run_before(call, &mut diags) {
            return diags;
        }

        operation(call, &mut diags);
        if diags.has_error() {
            return diags;
        }

        self.run_after(call, &mut diags);
        diags
    }

    /// Run the `before` hooks; `false` if one of them recorded an error
    ///
    /// For operations that cannot be expressed as a closure (e.g. async
    /// calls), pair with [`Interceptors::run_after`].
    pub fn run_before(&self, call: &mut C, diags: &mut Diagnostics) -> bool {
        for interceptor in &self.interceptors {
            log::trace!("interceptor {} before", interceptor.name());
            interceptor.before(call, diags);
            if diags.has_error() {
                return false;
            }
        }
        true
    }

    /// Run the `after` hooks in reverse order, stopping at the first error
    pub fn run_after(&self, call: &mut C, diags: &mut Diagnostics) {
        for interceptor in self.interceptors.iter().rev() {
            log::trace!("interceptor {} after", interceptor.name());
            interceptor.after(call, diags);
            if diags.has_error() {
                break;
            }
        }
    }
}
