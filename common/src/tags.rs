//! タグ列の読み出し
//!
//! 木を組み立てずにHTMLトークナイザーの開始・終了タグをそのまま並べる。
//! 文脈による補正がないので、`<tr>` や `<td>` だけの断片もタグとして残る。

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// 開始タグまたは終了タグ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEvent {
    pub name: String,
    pub is_end: bool,
    pub self_closing: bool,
    /// 書かれた順の (属性名, 値)
    pub attrs: Vec<(String, String)>,
}

impl TagEvent {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct TagCollector {
    events: Vec<TagEvent>,
}

impl TokenSink for TagCollector {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let Token::TagToken(tag) = token else {
            return TokenSinkResult::Continue;
        };
        let raw = match (tag.kind, &*tag.name) {
            (TagKind::StartTag, "script") => Some(RawKind::ScriptData),
            (TagKind::StartTag, "style" | "noframes" | "xmp" | "iframe") => Some(RawKind::Rawtext),
            (TagKind::StartTag, "title" | "textarea") => Some(RawKind::Rcdata),
            _ => None,
        };
        self.events.push(to_event(tag));
        match raw {
            Some(kind) => TokenSinkResult::RawData(kind),
            None => TokenSinkResult::Continue,
        }
    }
}

fn to_event(tag: Tag) -> TagEvent {
    TagEvent {
        name: tag.name.to_string(),
        is_end: tag.kind == TagKind::EndTag,
        self_closing: tag.self_closing,
        attrs: tag
            .attrs
            .iter()
            .map(|a| (a.name.local.to_string(), a.value.to_string()))
            .collect(),
    }
}

/// 断片のタグを出現順に返す
///
/// スクリプト・スタイルの中身はタグとして読まない。壊れたマークアップでもエラーにはならない。
pub fn tag_events(html: &str) -> Vec<TagEvent> {
    let mut queue = BufferQueue::default();
    queue.push_back(StrTendril::from(html));

    let mut tokenizer = Tokenizer::new(TagCollector::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut queue);
    tokenizer.end();
    tokenizer.sink.events
}
