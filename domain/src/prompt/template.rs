//! Prompt templates for a recommendation round

use crate::core::language::Language;
use crate::preferences::Preferences;
use crate::recommendation::ExclusionSet;

const SYSTEM_EN: &str = r#"Role: You are an expert librarian and bibliophile with more than 20 years of experience in literary curation and reader advisory. You notice the patterns in a reader's taste and turn them into deeply personal suggestions.
Goal: Read the reader's profile (the kinds of books they enjoy, books they love, and how adventurous they feel) and recommend the 3 to 5 books that fit them best.
Constraints:
* Accuracy: Only recommend real, published books. Never invent titles or authors.
* Tone: The explanation must be warm, conversational and tailored to this reader.
* Format: Output ONLY a JSON array. No introduction, no Markdown code fences, no closing remarks.
Return format:
[
  {
    "title": "String",
    "author": "String",
    "year": Integer,
    "explanation": "1-3 conversational sentences."
  }
]
Warnings:
* No text outside the JSON array.
* The array holds no fewer than 3 and no more than 5 books.
* "year" is the original publication year as a bare integer, never a string."#;

const SYSTEM_ZH: &str = r#"角色：你是一位拥有 20 多年经验的资深馆藏专家与图书推介人，擅长从读者零散的喜好中捕捉其审美逻辑，给出极具个性化的书单。
任务：阅读读者的资料（喜欢的图书类型、深爱的书、想要多大程度的新鲜感），用中文推荐 3 到 5 本最贴合其品位的书。
约束：
* 真实性：只推荐真实出版过的书，严禁虚构书名或作者。
* 语气：explanation 字段要亲切自然、有对话感，像在和读者聊天。
* 格式：只输出一个 JSON 数组，不要任何前言、后记或 Markdown 代码块标记。
返回格式：
[
  {
    "title": "书名",
    "author": "作者",
    "year": 整数,
    "explanation": "1-3 句有对话感的推荐理由。"
  }
]
警告：
* JSON 数组之外不得出现任何文字。
* 数组中书的数量必须在 3 到 5 本之间。
* "year" 为首次出版年份，必须是整数，不得加引号。"#;

/// The pair of messages sent for one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Templates for generating the recommendation prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt: persona and strict output contract. Never depends on
    /// user input.
    pub fn system(language: Language) -> &'static str {
        match language {
            Language::En => SYSTEM_EN,
            Language::Zh => SYSTEM_ZH,
        }
    }

    /// User prompt for the given preferences and already-shown titles
    pub fn user(prefs: &Preferences, exclusions: &ExclusionSet, language: Language) -> String {
        let sep = language.list_separator();
        let genres = prefs
            .genres()
            .iter()
            .map(|g| g.display_name(language))
            .collect::<Vec<_>>()
            .join(sep);
        let books = prefs.favorite_books().join(sep);
        let level = prefs.adventurousness().description(language);

        let mut prompt = match language {
            Language::En => format!(
                "Kinds of books I enjoy: {genres}.\n\
                 Some books I love: {books}.\n\
                 How adventurous the picks should be: {level}.\n\n"
            ),
            Language::Zh => format!(
                "我喜欢的图书类型：{genres}。\n\
                 我深爱的书：{books}。\n\
                 推荐的新鲜程度：{level}。\n\n"
            ),
        };

        if !exclusions.is_empty() {
            prompt.push_str(Self::exclusion_header(language));
            prompt.push('\n');
            for title in exclusions.titles() {
                prompt.push_str(&format!("  - {}\n", title));
            }
            prompt.push('\n');
        }

        prompt.push_str(match language {
            Language::En => {
                "Please recommend 3 to 5 books as a JSON array of objects with keys: \
                 title, author, year, explanation."
            }
            Language::Zh => {
                "请推荐 3 到 5 本书，以 JSON 数组输出，每个对象包含键：title、author、year、explanation。"
            }
        });
        prompt
    }

    /// Both prompts for one attempt
    pub fn build(prefs: &Preferences, exclusions: &ExclusionSet, language: Language) -> PromptPair {
        PromptPair {
            system: Self::system(language).to_string(),
            user: Self::user(prefs, exclusions, language),
        }
    }

    /// First line of the "do not repeat" clause
    pub fn exclusion_header(language: Language) -> &'static str {
        match language {
            Language::En => {
                "IMPORTANT: Do NOT recommend any of these books, which have already been suggested:"
            }
            Language::Zh => "重要：不要推荐以下任何已经推荐过的书：",
        }
    }
}
