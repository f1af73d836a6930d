//! The editing session.
//!
//! An [`EditorSession`] is the owned handle for one activation: it holds
//! the region, the options, the host capability, and every piece of
//! transient state (direction verdict, pending debounce, pending paste).
//! Activating a different region means deactivating this session first —
//! exclusivity is enforced by ownership, not by a global.

use super::commands::Command;
use super::events::EventBus;
use super::options::EditorOptions;
use super::region::{EditableRegion, Selection};
use super::schedule::{CHANGE_DEBOUNCE_MS, Debounce, PASTE_CAPTURE_DELAY_MS, PasteCapture};
use super::selection::with_preserved_selection;
use crate::direction::{Direction, classify};
use crate::dom::{Element, Fragment, Node, Tag};
use crate::host::{FormattingHost, NativeCommand, StateQuery, same_font_family};
use crate::models::{self, ContentNode};
use crate::normalize::{desemantify, mark_code_fonts, sanitize_paste, semantify};

pub struct EditorSession<H: FormattingHost> {
    host: H,
    options: EditorOptions,
    region: EditableRegion,
    direction: Direction,
    events: EventBus,
    changed: Debounce,
    paste: Option<PasteCapture>,
    showing_placeholder: bool,
}

impl<H: FormattingHost> EditorSession<H> {
    /// Begin editing a region. The region's canonical content is rewritten
    /// to the presentational form the host's native commands recognize,
    /// preserving any selection the region carries.
    pub fn activate(region: EditableRegion, options: EditorOptions, host: H) -> EditorSession<H> {
        let mut session = EditorSession {
            host,
            options,
            region,
            direction: Direction::Neutral,
            events: EventBus::new(),
            changed: Debounce::new(CHANGE_DEBOUNCE_MS),
            paste: None,
            showing_placeholder: false,
        };
        if session.options.markup {
            let font = session.options.code_font_family.clone();
            with_preserved_selection(&mut session.region, |frag| desemantify(frag, &font));
        }
        if session.options.start_empty {
            session.apply_placeholder();
        }
        session.refresh_direction();
        session
    }

    /// End editing. Pending notifications and captures are dropped, never
    /// delivered; the region comes back without placeholder filler.
    /// Idempotent by construction — the session is consumed.
    pub fn deactivate(mut self) -> EditableRegion {
        self.changed.cancel();
        self.paste = None;
        if self.showing_placeholder {
            self.region.fragment = Fragment::default();
            self.region.clear_selection();
        }
        self.region
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn region(&self) -> &EditableRegion {
        &self.region
    }

    pub fn select(&mut self, selection: Selection) {
        self.region.select(selection);
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // --- Content reads -------------------------------------------------

    /// Canonical HTML content of the region, `""` in the placeholder
    /// state. In plain-text mode, trimmed tag-stripped text instead.
    pub fn content(&self) -> String {
        if self.showing_placeholder {
            return String::new();
        }
        if self.options.markup {
            semantify(&mark_code_fonts(&self.region.fragment)).to_html()
        } else {
            self.plain_text().trim().to_string()
        }
    }

    /// `content()` with all markup removed and entities decoded.
    pub fn content_stripped(&self) -> String {
        Fragment::parse(&self.content()).text()
    }

    /// The typed semantic tree, materialized fresh on every call.
    pub fn canonical(&self) -> Vec<ContentNode> {
        if self.showing_placeholder {
            return Vec::new();
        }
        models::from_fragment(&semantify(&mark_code_fonts(&self.region.fragment)))
    }

    fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.region.fragment.children {
            let is_block = node
                .as_element()
                .is_some_and(|el| matches!(el.tag, Tag::P | Tag::Div) || el.tag.is_list());
            if self.options.multiline && is_block && !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&node.text_content());
        }
        out
    }

    /// Last-computed direction verdict; recomputed on every input
    /// notification.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn refresh_direction(&mut self) {
        self.direction = classify(&self.region.text(), false);
    }

    // --- Host notifications --------------------------------------------

    /// The host reports that the user edited the region. Freshly produced
    /// font elements get the code marker class, the direction verdict is
    /// recomputed, and a change notification is scheduled.
    pub fn notify_input(&mut self, now_ms: u64) {
        if self.options.markup {
            self.region.fragment = mark_code_fonts(&self.region.fragment);
        }
        self.refresh_direction();
        self.changed.request(now_ms);
    }

    pub fn notify_focus(&mut self) {
        if self.showing_placeholder {
            self.region.fragment = Fragment::default();
            self.region.clear_selection();
            self.showing_placeholder = false;
        }
    }

    pub fn notify_blur(&mut self) {
        if !self.showing_placeholder {
            self.apply_placeholder();
        }
    }

    /// The host mutated the region's tree (native command side effects).
    /// The rewrite runs under the selection guard.
    pub fn apply_host_mutation(&mut self, mutate: impl FnOnce(&Fragment) -> Fragment) {
        with_preserved_selection(&mut self.region, mutate);
    }

    /// Fire whatever deferred work is due. Returns whether a `changed`
    /// event was delivered.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.changed.poll(now_ms) {
            self.events.trigger("changed");
            return true;
        }
        false
    }

    // --- Events --------------------------------------------------------

    pub fn bind(&mut self, event: &str, handler: impl FnMut(&str) + 'static) {
        self.events.bind(event, handler);
    }

    pub fn unbind(&mut self, event: &str) {
        self.events.unbind(event);
    }

    pub fn trigger(&mut self, event: &str) {
        self.events.trigger(event);
    }

    // --- Commands ------------------------------------------------------

    /// Whether a command's formatting is active at the current selection.
    /// Host query failures read as inactive.
    pub fn command_active(&self, command: Command) -> bool {
        match command {
            Command::Emphasis => self.query(StateQuery::Italic),
            Command::Strong => self.query(StateQuery::Bold),
            Command::Code => match self.host.query_font_name() {
                Ok(name) => same_font_family(
                    &name,
                    &self.options.code_font_family,
                    self.host.single_font_name_reported(),
                ),
                Err(err) => {
                    tracing::debug!("font name query failed: {err}");
                    false
                }
            },
            Command::UnorderedList => self.query(StateQuery::UnorderedList),
            Command::OrderedList => self.query(StateQuery::OrderedList),
            Command::Link | Command::Indent | Command::Outdent => false,
        }
    }

    /// Execute an editor command, honoring annotation exclusivity.
    pub fn exec(&mut self, command: Command, now_ms: u64) {
        if !self.options.markup {
            return;
        }
        match command {
            Command::Emphasis | Command::Strong | Command::Code => {
                self.toggle_annotation(command);
            }
            Command::Link => self.create_link(),
            Command::UnorderedList => self.run_native(NativeCommand::ToggleUnorderedList),
            Command::OrderedList => self.run_native(NativeCommand::ToggleOrderedList),
            Command::Indent => self.indent(NativeCommand::Indent),
            Command::Outdent => self.indent(NativeCommand::Outdent),
        }
        self.changed.request(now_ms);
    }

    fn toggle_annotation(&mut self, command: Command) {
        if self.command_active(command) {
            self.toggle_off(command);
        } else {
            self.remove_format();
            self.toggle_on(command);
        }
    }

    fn toggle_on(&mut self, command: Command) {
        match command {
            Command::Emphasis => self.run_native(NativeCommand::ToggleItalic),
            Command::Strong => self.run_native(NativeCommand::ToggleBold),
            Command::Code => {
                let font = self.options.code_font_family.clone();
                self.run_native(NativeCommand::SetFontName(font));
                self.region.fragment = mark_code_fonts(&self.region.fragment);
            }
            _ => {}
        }
    }

    fn toggle_off(&mut self, command: Command) {
        match command {
            Command::Emphasis => self.run_native(NativeCommand::ToggleItalic),
            Command::Strong => self.run_native(NativeCommand::ToggleBold),
            Command::Code => self.run_native(NativeCommand::RemoveFormat),
            _ => {}
        }
    }

    /// Clear every active inline annotation at the selection.
    fn remove_format(&mut self) {
        self.run_native(NativeCommand::RemoveFormat);
        for command in Command::ANNOTATIONS {
            if self.command_active(command) {
                self.toggle_off(command);
            }
        }
    }

    fn create_link(&mut self) {
        // Link text must not carry a conflicting inline style.
        self.remove_format();
        if let Some(target) = self.host.request_link_target() {
            self.run_native(NativeCommand::CreateLink(target));
        }
    }

    fn indent(&mut self, command: NativeCommand) {
        if self.query(StateQuery::UnorderedList) || self.query(StateQuery::OrderedList) {
            self.run_native(command);
        }
    }

    fn query(&self, query: StateQuery) -> bool {
        self.host.query_state(query).unwrap_or_else(|err| {
            tracing::debug!("state query failed: {err}");
            false
        })
    }

    fn run_native(&mut self, command: NativeCommand) {
        if let Err(err) = self.host.exec(command) {
            tracing::warn!("native command failed: {err}");
        }
    }

    // --- Paste ---------------------------------------------------------

    /// Phase one of a paste: the host redirected focus to its capture
    /// sink. Records what was active at the insertion point. A second
    /// paste while one is pending is ignored; returns whether capture
    /// began.
    pub fn begin_paste(&mut self, now_ms: u64) -> bool {
        if self.paste.is_some() {
            tracing::debug!("paste capture already pending, ignoring re-entry");
            return false;
        }
        let annotation_active = Command::ANNOTATIONS
            .iter()
            .any(|c| self.command_active(*c));
        self.paste = Some(PasteCapture {
            due_ms: now_ms + PASTE_CAPTURE_DELAY_MS,
            annotation_active,
        });
        true
    }

    /// Whether the pending capture is ready to be read.
    pub fn paste_due(&self, now_ms: u64) -> bool {
        self.paste.as_ref().is_some_and(|p| now_ms >= p.due_ms)
    }

    /// Phase two: the host read the captured markup out of its sink.
    /// Sanitizes and inserts; an empty sanitized result inserts nothing.
    /// Without a pending capture this is a no-op.
    pub fn complete_paste(&mut self, now_ms: u64, captured: &str) {
        let Some(capture) = self.paste.take() else {
            return;
        };
        if let Some(markup) = sanitize_paste(
            captured,
            &self.options.code_font_family,
            capture.annotation_active,
        ) && let Err(err) = self.host.insert_markup(&markup)
        {
            tracing::warn!("markup insertion failed: {err}");
        }
        self.changed.request(now_ms);
    }

    // --- Placeholder ---------------------------------------------------

    fn apply_placeholder(&mut self) {
        if !self.region.is_blank() {
            return;
        }
        let placeholder = self.options.placeholder.clone();
        self.region.fragment = if self.options.markup {
            Fragment::new(vec![Node::Element(
                Element::new(Tag::P).with_children(vec![Node::text(placeholder)]),
            )])
        } else {
            Fragment::new(vec![Node::text(placeholder)])
        };
        self.region.clear_selection();
        self.showing_placeholder = true;
    }

    /// Whether the region currently shows placeholder filler instead of
    /// content.
    pub fn is_empty(&self) -> bool {
        self.showing_placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostError;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const DEFAULT_FONT: &str = "serif";

    /// Scripted host tracking the formatting state a real surface would
    /// hold in its DOM.
    #[derive(Debug)]
    struct StubHost {
        italic: bool,
        bold: bool,
        font_name: String,
        unordered: bool,
        ordered: bool,
        link: Option<String>,
        link_target: Option<String>,
        inserted: Vec<String>,
        executed: Vec<NativeCommand>,
        fail_everything: bool,
    }

    impl Default for StubHost {
        fn default() -> StubHost {
            StubHost {
                italic: false,
                bold: false,
                font_name: DEFAULT_FONT.to_string(),
                unordered: false,
                ordered: false,
                link: None,
                link_target: Some("https://example.com".to_string()),
                inserted: Vec::new(),
                executed: Vec::new(),
                fail_everything: false,
            }
        }
    }

    impl FormattingHost for StubHost {
        fn query_state(&self, query: StateQuery) -> Result<bool, HostError> {
            if self.fail_everything {
                return Err(HostError::Unsupported("query".to_string()));
            }
            Ok(match query {
                StateQuery::Bold => self.bold,
                StateQuery::Italic => self.italic,
                StateQuery::UnorderedList => self.unordered,
                StateQuery::OrderedList => self.ordered,
            })
        }

        fn query_font_name(&self) -> Result<String, HostError> {
            if self.fail_everything {
                return Err(HostError::Unsupported("fontName".to_string()));
            }
            Ok(self.font_name.clone())
        }

        fn exec(&mut self, command: NativeCommand) -> Result<(), HostError> {
            if self.fail_everything {
                return Err(HostError::Rejected(format!("{command:?}")));
            }
            self.executed.push(command.clone());
            match command {
                NativeCommand::ToggleBold => self.bold = !self.bold,
                NativeCommand::ToggleItalic => self.italic = !self.italic,
                NativeCommand::SetFontName(name) => self.font_name = name,
                NativeCommand::RemoveFormat => {
                    self.bold = false;
                    self.italic = false;
                    self.font_name = DEFAULT_FONT.to_string();
                }
                NativeCommand::CreateLink(target) => self.link = Some(target),
                NativeCommand::ToggleUnorderedList => self.unordered = !self.unordered,
                NativeCommand::ToggleOrderedList => self.ordered = !self.ordered,
                NativeCommand::Indent | NativeCommand::Outdent => {}
            }
            Ok(())
        }

        fn insert_markup(&mut self, markup: &str) -> Result<(), HostError> {
            if self.fail_everything {
                return Err(HostError::Rejected("insertHTML".to_string()));
            }
            self.inserted.push(markup.to_string());
            Ok(())
        }

        fn request_link_target(&mut self) -> Option<String> {
            self.link_target.clone()
        }
    }

    fn session_with(html: &str) -> EditorSession<StubHost> {
        EditorSession::activate(
            EditableRegion::from_html(html),
            EditorOptions::default(),
            StubHost::default(),
        )
    }

    fn active_annotations(session: &EditorSession<StubHost>) -> Vec<Command> {
        Command::ANNOTATIONS
            .iter()
            .copied()
            .filter(|c| session.command_active(*c))
            .collect()
    }

    #[test]
    fn activation_desemantifies_the_region() {
        let session = session_with("<p><em>a</em><code>b</code></p>");
        let html = session.region().to_html();
        assert!(html.contains("<i>a</i>"), "{html}");
        assert!(html.contains("<font class=\"canon-code\""), "{html}");
    }

    #[test]
    fn content_is_canonical_html() {
        let session = session_with("<p><em>a</em></p>");
        assert_eq!(session.content(), "<p><em>a</em></p>");
    }

    #[test]
    fn content_recognizes_host_produced_fonts_as_code() {
        let mut session = session_with("");
        session.apply_host_mutation(|_| Fragment::parse("<p><font face=\"Monaco\">x</font></p>"));
        session.notify_input(0);
        assert_eq!(session.content(), "<p><code>x</code></p>");
    }

    #[test]
    fn content_stripped_removes_markup_and_decodes_entities() {
        let mut session = session_with("");
        session.apply_host_mutation(|_| Fragment::parse("<p>a &amp; <b>b</b></p>"));
        assert_eq!(session.content_stripped(), "a & b");
    }

    #[test]
    fn plain_text_mode_strips_markup() {
        let mut session = EditorSession::activate(
            EditableRegion::from_html("<div>one</div><div>two</div>"),
            EditorOptions {
                markup: false,
                ..EditorOptions::default()
            },
            StubHost::default(),
        );
        assert_eq!(session.content(), "one\ntwo");
        // Formatting commands are inert without markup.
        session.exec(Command::Strong, 0);
        assert!(session.host().executed.is_empty());
    }

    #[test]
    fn placeholder_region_reads_as_empty() {
        let session = EditorSession::activate(
            EditableRegion::from_html(""),
            EditorOptions {
                start_empty: true,
                ..EditorOptions::default()
            },
            StubHost::default(),
        );
        assert!(session.is_empty());
        assert_eq!(session.content(), "");
        assert_eq!(session.canonical(), Vec::new());
        // The placeholder text is in the region itself.
        assert_eq!(session.region().text(), "Enter Text");
    }

    #[test]
    fn focus_clears_and_blur_restores_the_placeholder() {
        let mut session = EditorSession::activate(
            EditableRegion::from_html(""),
            EditorOptions {
                start_empty: true,
                ..EditorOptions::default()
            },
            StubHost::default(),
        );
        session.notify_focus();
        assert!(!session.is_empty());
        assert_eq!(session.region().text(), "");
        session.notify_blur();
        assert!(session.is_empty());
        assert_eq!(session.region().text(), "Enter Text");
    }

    #[test]
    fn blur_with_content_keeps_the_content() {
        let mut session = session_with("<p>kept</p>");
        session.notify_blur();
        assert!(!session.is_empty());
        assert_eq!(session.content(), "<p>kept</p>");
    }

    #[test]
    fn deactivate_returns_the_region_without_placeholder() {
        let session = EditorSession::activate(
            EditableRegion::from_html(""),
            EditorOptions {
                start_empty: true,
                ..EditorOptions::default()
            },
            StubHost::default(),
        );
        let region = session.deactivate();
        assert_eq!(region.text(), "");
    }

    #[test]
    fn annotations_stay_mutually_exclusive() {
        let mut session = session_with("<p>a</p>");
        let toggles = [
            Command::Emphasis,
            Command::Strong,
            Command::Code,
            Command::Strong,
            Command::Emphasis,
            Command::Code,
        ];
        for command in toggles {
            session.exec(command, 0);
            let active = active_annotations(&session);
            assert!(active.len() <= 1, "multiple annotations active: {active:?}");
            assert_eq!(active, vec![command]);
        }
    }

    #[test]
    fn toggling_an_active_annotation_turns_it_off() {
        let mut session = session_with("<p>a</p>");
        session.exec(Command::Emphasis, 0);
        assert!(session.command_active(Command::Emphasis));
        session.exec(Command::Emphasis, 0);
        assert_eq!(active_annotations(&session), Vec::new());
    }

    #[test]
    fn code_toggles_off_via_remove_format() {
        let mut session = session_with("<p>a</p>");
        session.exec(Command::Code, 0);
        assert!(session.command_active(Command::Code));
        session.exec(Command::Code, 0);
        assert!(!session.command_active(Command::Code));
        assert_eq!(session.host().font_name, DEFAULT_FONT);
    }

    #[test]
    fn link_clears_annotations_but_not_the_reverse() {
        let mut session = session_with("<p>a</p>");
        session.exec(Command::Strong, 0);
        session.exec(Command::Link, 0);
        assert_eq!(active_annotations(&session), Vec::new());
        assert_eq!(
            session.host().link.as_deref(),
            Some("https://example.com")
        );
        // Toggling an annotation afterwards leaves the link alone.
        session.exec(Command::Emphasis, 0);
        assert_eq!(
            session.host().link.as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn aborted_link_prompt_creates_no_link() {
        let mut session = session_with("<p>a</p>");
        session.host_mut().link_target = None;
        session.exec(Command::Link, 0);
        assert_eq!(session.host().link, None);
    }

    #[test]
    fn indent_requires_an_active_list() {
        let mut session = session_with("<p>a</p>");
        session.exec(Command::Indent, 0);
        assert!(!session.host().executed.contains(&NativeCommand::Indent));
        session.host_mut().unordered = true;
        session.exec(Command::Indent, 0);
        assert!(session.host().executed.contains(&NativeCommand::Indent));
    }

    #[test]
    fn failing_host_reads_as_inactive_and_never_panics() {
        let mut session = session_with("<p>a</p>");
        session.host_mut().fail_everything = true;
        assert_eq!(active_annotations(&session), Vec::new());
        session.exec(Command::Emphasis, 0);
        session.exec(Command::UnorderedList, 0);
        session.begin_paste(0);
        session.complete_paste(10, "<b>x</b>");
    }

    #[test]
    fn input_burst_produces_one_changed_event() {
        let mut session = session_with("<p>a</p>");
        let fired = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&fired);
        session.bind("changed", move |_| *counter.borrow_mut() += 1);
        session.notify_input(0);
        session.notify_input(50);
        session.notify_input(100);
        assert!(!session.poll(150));
        assert!(session.poll(200));
        assert!(!session.poll(1000));
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn direction_follows_the_region_content() {
        let mut session = session_with("<p>hello</p>");
        assert_eq!(session.direction(), Direction::Ltr);
        session.apply_host_mutation(|_| Fragment::parse("<p>שלום</p>"));
        session.notify_input(0);
        assert_eq!(session.direction(), Direction::Rtl);
    }

    #[test]
    fn paste_is_sanitized_before_insertion() {
        let mut session = session_with("<p>a</p>");
        assert!(session.begin_paste(0));
        assert!(session.paste_due(PASTE_CAPTURE_DELAY_MS));
        session.complete_paste(10, "<p>a<script>evil()</script>b</p><div onclick=\"x\">c</div>");
        assert_eq!(session.host().inserted, vec!["<p>ab</p>c".to_string()]);
    }

    #[test]
    fn paste_reentry_is_ignored_while_pending() {
        let mut session = session_with("<p>a</p>");
        assert!(session.begin_paste(0));
        assert!(!session.begin_paste(5));
        session.complete_paste(10, "x");
        assert!(session.begin_paste(20));
    }

    #[test]
    fn paste_under_active_annotation_is_stripped() {
        let mut session = session_with("<p>a</p>");
        session.exec(Command::Strong, 0);
        session.begin_paste(0);
        session.complete_paste(10, "<b>bold</b> plain");
        assert_eq!(session.host().inserted, vec!["bold plain".to_string()]);
    }

    #[test]
    fn empty_paste_inserts_nothing() {
        let mut session = session_with("<p>a</p>");
        session.begin_paste(0);
        session.complete_paste(10, "<!-- only a comment -->");
        assert!(session.host().inserted.is_empty());
    }

    #[test]
    fn complete_paste_without_capture_is_a_no_op() {
        let mut session = session_with("<p>a</p>");
        session.complete_paste(10, "<b>x</b>");
        assert!(session.host().inserted.is_empty());
    }
}
