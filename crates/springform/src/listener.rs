//! Region-tracking stream engine.
//!
//! A [`Listener`] picks "interesting" start tags. For each one the engine opens a
//! tracked region, buffers everything up to the depth-matched end tag, and hands
//! the whole region to the listener to rewrite.
//!
//! Contract:
//! - Events outside any region are yielded in input order as soon as they are read.
//! - A region's output is `start, interior, end` as returned by the listener, spliced
//!   into the enclosing region (or the output) at the position of its end tag.
//! - Nested regions close before their parent, so a parent always sees rewritten
//!   children in its interior.
//! - The first error fuses the iterator. Context frames opened during the
//!   traversal are dropped on error and when the iterator is dropped mid-region.

use crate::context::Context;
use crate::error::Error;
use markup::{EndTag, Event, QName, StartTag};
use std::collections::VecDeque;

pub trait Listener {
    type Handler: Copy;
    type History;

    /// Decide whether `tag` opens a tracked region.
    fn inspect(&self, tag: &StartTag, ctx: &Context) -> Option<Self::Handler>;

    /// Runs when the region opens. Returning `None` elides the start tag.
    fn start(
        &mut self,
        handler: Self::Handler,
        tag: StartTag,
        ctx: &mut Context,
    ) -> Result<(Option<StartTag>, Self::History), Error>;

    /// Runs at the depth-matched end tag with everything buffered in between.
    fn end(
        &mut self,
        handler: Self::Handler,
        closed: Closed<Self::History>,
        ctx: &mut Context,
    ) -> Result<Rewrite, Error>;
}

/// A tracked region at the moment its end tag arrives.
#[derive(Debug)]
pub struct Closed<H> {
    /// Start tag as returned by [`Listener::start`].
    pub start: Option<StartTag>,
    pub end: EndTag,
    pub interior: Vec<Event>,
    pub history: H,
}

/// What a closed region becomes in the output.
#[derive(Debug, Default)]
pub struct Rewrite {
    pub start: Option<StartTag>,
    pub end: Option<EndTag>,
    pub interior: Vec<Event>,
}

impl Rewrite {
    /// Drop both tags, keep the interior.
    pub fn elide(interior: Vec<Event>) -> Self {
        Self {
            start: None,
            end: None,
            interior,
        }
    }

    /// Region whose start tag was already dropped upstream.
    pub fn headless(end: EndTag, interior: Vec<Event>) -> Self {
        Self {
            start: None,
            end: Some(end),
            interior,
        }
    }
}

struct Region<L: Listener> {
    handler: L::Handler,
    start: Option<StartTag>,
    /// Name of the start tag as read from input.
    name: QName,
    depth: usize,
    interior: Vec<Event>,
    history: L::History,
}

pub struct Transform<'c, I, L: Listener> {
    input: I,
    listener: L,
    ctx: &'c mut Context,
    ctx_depth: usize,
    depth: usize,
    regions: Vec<Region<L>>,
    ready: VecDeque<Event>,
    done: bool,
}

impl<'c, I, L> Transform<'c, I, L>
where
    I: Iterator<Item = Event>,
    L: Listener,
{
    pub fn new(input: I, listener: L, ctx: &'c mut Context) -> Self {
        let ctx_depth = ctx.depth();
        Self {
            input,
            listener,
            ctx,
            ctx_depth,
            depth: 0,
            regions: Vec::new(),
            ready: VecDeque::new(),
            done: false,
        }
    }

    fn emit(&mut self, event: Event) {
        match self.regions.last_mut() {
            Some(region) => region.interior.push(event),
            None => self.ready.push_back(event),
        }
    }

    fn step(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::Start(tag) => {
                self.depth += 1;
                let Some(handler) = self.listener.inspect(&tag, self.ctx) else {
                    self.emit(Event::Start(tag));
                    return Ok(());
                };
                log::trace!(
                    target: "springform.engine",
                    "open region <{}> at depth {}",
                    tag.name,
                    self.depth
                );
                let name = tag.name.clone();
                let (start, history) = self.listener.start(handler, tag, self.ctx)?;
                self.regions.push(Region {
                    handler,
                    start,
                    name,
                    depth: self.depth,
                    interior: Vec::new(),
                    history,
                });
                Ok(())
            }
            Event::End(tag) => {
                if self.depth == 0 {
                    return Err(Error::UnexpectedEnd {
                        name: tag.name,
                        span: tag.span,
                    });
                }
                let closes_region = self
                    .regions
                    .last()
                    .is_some_and(|region| region.depth == self.depth);
                self.depth -= 1;
                if closes_region {
                    self.close(tag)
                } else {
                    self.emit(Event::End(tag));
                    Ok(())
                }
            }
            other => {
                self.emit(other);
                Ok(())
            }
        }
    }

    fn close(&mut self, end: EndTag) -> Result<(), Error> {
        let Some(region) = self.regions.pop() else {
            return Ok(());
        };
        if region.name != end.name {
            return Err(Error::MismatchedEnd {
                expected: region.name,
                found: end.name,
                span: end.span,
            });
        }
        log::trace!(
            target: "springform.engine",
            "close region <{}> with {} buffered event(s)",
            region.name,
            region.interior.len()
        );
        let closed = Closed {
            start: region.start,
            end,
            interior: region.interior,
            history: region.history,
        };
        let rewrite = self.listener.end(region.handler, closed, self.ctx)?;
        if let Some(start) = rewrite.start {
            self.emit(Event::Start(start));
        }
        for event in rewrite.interior {
            self.emit(event);
        }
        if let Some(end) = rewrite.end {
            self.emit(Event::End(end));
        }
        Ok(())
    }

    fn abandon(&mut self) {
        self.done = true;
        self.regions.clear();
        self.ready.clear();
        self.ctx.truncate(self.ctx_depth);
    }
}

impl<I, L> Iterator for Transform<'_, I, L>
where
    I: Iterator<Item = Event>,
    L: Listener,
{
    type Item = Result<Event, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }
            match self.input.next() {
                Some(event) => {
                    if let Err(err) = self.step(event) {
                        self.abandon();
                        return Some(Err(err));
                    }
                }
                None => {
                    self.done = true;
                    if let Some(region) = self.regions.last() {
                        let err = Error::Unclosed {
                            name: region.name.clone(),
                            span: region.start.as_ref().and_then(|start| start.span),
                            open: self.regions.len(),
                        };
                        self.abandon();
                        return Some(Err(err));
                    }
                }
            }
        }
    }
}

impl<I, L: Listener> Drop for Transform<'_, I, L> {
    fn drop(&mut self) {
        if !self.regions.is_empty() {
            self.ctx.truncate(self.ctx_depth);
        }
    }
}
