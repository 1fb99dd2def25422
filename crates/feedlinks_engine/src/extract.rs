use std::cell::RefCell;

use feedlinks_core::{FeedCollection, FeedKind};
use feedlinks_logging::feed_debug;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

pub trait FeedExtractor: Send + Sync {
    fn extract(&self, html: &str) -> FeedCollection;
}

/// Collects `href`s of `<link>` and `<a>` start tags whose `type` names an
/// RSS or Atom feed, in source order.
///
/// - tag and attribute names are matched case-insensitively
/// - `rel`, nesting and position are ignored
/// - tags without `href` or `type` are skipped
/// - comments and `<script>`/`<style>` bodies are never scanned
///
/// Only the tokenizer runs; there is no tree builder, so no element is moved,
/// dropped or treated as raw text besides `script` and `style`.
#[derive(Debug, Default)]
pub struct LinkTagExtractor;

impl FeedExtractor for LinkTagExtractor {
    fn extract(&self, html: &str) -> FeedCollection {
        let input = BufferQueue::default();
        input.push_back(StrTendril::from_slice(html));

        let tokenizer = Tokenizer::new(FeedLinkSink::default(), TokenizerOpts::default());
        let _ = tokenizer.feed(&input);
        tokenizer.end();

        tokenizer.sink.feeds.take()
    }
}

#[derive(Default)]
struct FeedLinkSink {
    feeds: RefCell<FeedCollection>,
}

impl TokenSink for FeedLinkSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let Token::TagToken(tag) = token else {
            return TokenSinkResult::Continue;
        };
        if !matches!(tag.kind, TagKind::StartTag) {
            return TokenSinkResult::Continue;
        }

        self.classify(&tag);

        // The raw-text switch is the scanner's only state. A self-closed
        // `<script/>` opens no body.
        match raw_text_kind(&tag) {
            Some(kind) if !tag.self_closing => TokenSinkResult::RawData(kind),
            _ => TokenSinkResult::Continue,
        }
    }
}

impl FeedLinkSink {
    fn classify(&self, tag: &Tag) {
        let name = &*tag.name;
        if name != "link" && name != "a" {
            return;
        }
        let Some(href) = attr(tag, "href") else {
            return;
        };
        let Some(content_type) = attr(tag, "type") else {
            feed_debug!("Skipping <{}> with href {:?}: no type attribute", name, href);
            return;
        };
        if let Some(kind) = FeedKind::from_mime_type(content_type) {
            self.feeds.borrow_mut().add(kind, href);
        }
    }
}

/// Tag and attribute names arrive lower-cased from the tokenizer, which also
/// drops repeated attributes after the first.
fn attr<'a>(tag: &'a Tag, name: &str) -> Option<&'a str> {
    tag.attrs
        .iter()
        .find(|attribute| &*attribute.name.local == name)
        .map(|attribute| &*attribute.value)
}

fn raw_text_kind(tag: &Tag) -> Option<RawKind> {
    match &*tag.name {
        "script" => Some(RawKind::ScriptData),
        "style" => Some(RawKind::Rawtext),
        _ => None,
    }
}
