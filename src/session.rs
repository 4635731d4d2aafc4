//! Installed surface map with last-rebuild-wins semantics.
//!
//! Every requested expression takes a [`Ticket`]. A rebuild finishing under
//! a ticket that is no longer the latest is dropped instead of installed, so
//! rapid edits never leave an older map active. Queries only read the
//! installed map.

use crate::pipeline::{rebuild, Rebuild, Renderer};
use crate::surface::{Operands, SurfaceConfig, SurfaceMap, SurfaceNode};

/// Sequence number of a requested rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct SurfaceSession {
    config: SurfaceConfig,
    latest: u64,
    latest_latex: Option<String>,
    current: Option<(Ticket, Rebuild)>,
}

impl SurfaceSession {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Register `latex` as the newest requested expression.
    pub fn begin(&mut self, latex: &str) -> Ticket {
        self.latest += 1;
        self.latest_latex = Some(latex.to_string());
        Ticket(self.latest)
    }

    /// Whether `ticket` is still the newest request.
    #[inline]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Install `result` if `ticket` is still current.
    ///
    /// Returns `false` and drops the rebuild when a newer request exists or
    /// when the rebuild is for a different expression than the one last
    /// requested.
    pub fn complete(&mut self, ticket: Ticket, result: Rebuild) -> bool {
        let matches_request = self.latest_latex.as_deref() == Some(result.latex.as_str());
        if !self.is_current(ticket) || !matches_request {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.latest,
                latex = result.latex.as_str(),
                "discarding stale rebuild"
            );
            return false;
        }
        self.current = Some((ticket, result));
        true
    }

    /// [`complete`](Self::complete) for a fallible rebuild.
    ///
    /// Errors from stale tickets are dropped like stale results; errors from
    /// the current ticket are returned and leave the installed map in place.
    pub fn finish(
        &mut self,
        ticket: Ticket,
        result: crate::Result<Rebuild>,
    ) -> crate::Result<bool> {
        match result {
            Ok(rebuild) => Ok(self.complete(ticket, rebuild)),
            Err(err) if self.is_current(ticket) => Err(err),
            Err(err) => {
                tracing::debug!(
                    ticket = ticket.0,
                    error = %err,
                    "discarding stale rebuild failure"
                );
                Ok(false)
            },
        }
    }

    /// Begin, rebuild and install `latex` in one step.
    pub fn refresh<R: Renderer + ?Sized>(
        &mut self,
        latex: &str,
        renderer: &R,
    ) -> crate::Result<bool> {
        let ticket = self.begin(latex);
        let result = rebuild(latex, renderer, &self.config);
        self.finish(ticket, result)
    }

    /// The installed rebuild, if any.
    pub fn current(&self) -> Option<&Rebuild> {
        self.current.as_ref().map(|(_, rebuild)| rebuild)
    }

    pub fn installed_ticket(&self) -> Option<Ticket> {
        self.current.as_ref().map(|(ticket, _)| *ticket)
    }

    pub fn surface(&self) -> Option<&SurfaceMap> {
        self.current().map(|rebuild| &rebuild.map)
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<&SurfaceNode> {
        self.current()?.hit_test(x, y)
    }

    /// Operands of `operator_path` in the installed map; empty without one.
    pub fn find_operands(&self, operator_path: &str) -> Operands {
        self.current()
            .map(|rebuild| rebuild.find_operands(operator_path))
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
