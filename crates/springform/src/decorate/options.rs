//! Marks the `<option>` of a select interior that matches a bound value.

use crate::context::Context;
use crate::error::Error;
use crate::listener::{Closed, Listener, Rewrite, Transform};
use markup::{Event, QName, StartTag};

pub struct OptionToggler {
    target: String,
}

impl OptionToggler {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

fn text_content(events: &[Event]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Text(text) => Some(text.content.as_str()),
            _ => None,
        })
        .collect()
}

impl Listener for OptionToggler {
    type Handler = ();
    type History = ();

    fn inspect(&self, tag: &StartTag, _ctx: &Context) -> Option<()> {
        tag.local_name().eq_ignore_ascii_case("option").then_some(())
    }

    fn start(
        &mut self,
        _handler: (),
        tag: StartTag,
        _ctx: &mut Context,
    ) -> Result<(Option<StartTag>, ()), Error> {
        Ok((Some(tag), ()))
    }

    fn end(&mut self, _handler: (), closed: Closed<()>, _ctx: &mut Context) -> Result<Rewrite, Error> {
        let Closed {
            start, end, interior, ..
        } = closed;
        let Some(start) = start else {
            return Ok(Rewrite::headless(end, interior));
        };
        let StartTag { name, attrs, span } = start;
        let selected_name = QName::new("selected");
        let attrs = attrs.with_removed(&selected_name);
        let selected = match attrs.get_plain("value") {
            Some(value) => value == self.target,
            None => text_content(&interior) == self.target,
        };
        let attrs = if selected {
            attrs.with_set(selected_name, "selected")
        } else {
            attrs
        };
        Ok(Rewrite {
            start: Some(StartTag { name, attrs, span }),
            end: Some(end),
            interior,
        })
    }
}

/// Run [`OptionToggler`] over a select interior.
pub fn toggle_options(
    interior: Vec<Event>,
    target: &str,
    ctx: &mut Context,
) -> Result<Vec<Event>, Error> {
    Transform::new(interior.into_iter(), OptionToggler::new(target), ctx).collect()
}
