//! Host-facing strings for English and Chinese
//!
//! Each language is a `static` table; lookups never fail and never allocate
//! unless a message takes an argument.

use bookbot_domain::Language;

/// All user-visible strings for one language
#[derive(Debug)]
pub struct Messages {
    // Language selection is bilingual and identical in both tables
    pub lang_prompt: &'static str,
    pub lang_option_1: &'static str,
    pub lang_option_2: &'static str,
    pub lang_input: &'static str,
    pub lang_invalid: &'static str,

    pub welcome: &'static str,

    genre_list: &'static str,
    pub genre_prompt: &'static str,
    pub genre_empty: &'static str,
    pub genre_count: &'static str,
    genre_invalid: &'static str,
    genre_allowed: &'static str,
    pub genre_dup: &'static str,

    pub book_prompt: &'static str,
    pub book_empty: &'static str,
    pub book_injection: &'static str,
    pub book_count: &'static str,
    book_invalid: &'static str,
    book_invalid_limit: &'static str,

    pub fam_header: &'static str,
    pub fam_options: [&'static str; 4],
    pub fam_prompt: &'static str,
    pub fam_empty: &'static str,
    pub fam_nan: &'static str,
    pub fam_range: &'static str,

    pub rec_header: &'static str,
    pub searching: &'static str,
    attempt_suffix: &'static str,
    pub retry_llm: &'static str,
    pub retry_parse: &'static str,
    pub retry_validate: &'static str,
    pub fail_all: &'static str,
    pub fail_later: &'static str,
    pub fail_duplicates: &'static str,
    pub fail_auth: &'static str,
    pub cancelled: &'static str,
    pub more_prompt: &'static str,
    pub more_yes: &'static str,
    pub more_no: &'static str,
    pub more_invalid: &'static str,
    pub bye: &'static str,
}

const LANG_PROMPT: &str = "Choose your language / 选择语言:";
const LANG_OPTION_1: &str = "  1 = English";
const LANG_OPTION_2: &str = "  2 = 中文";
const LANG_INPUT: &str = "Enter 1 or 2 / 输入 1 或 2: ";
const LANG_INVALID: &str = "Please enter 1 or 2. / 请输入 1 或 2。";

static EN: Messages = Messages {
    lang_prompt: LANG_PROMPT,
    lang_option_1: LANG_OPTION_1,
    lang_option_2: LANG_OPTION_2,
    lang_input: LANG_INPUT,
    lang_invalid: LANG_INVALID,

    welcome: "Hey there! I'm BookBot, your personal book recommender. Let's find your next read!",

    genre_list: "Pick your flavor(s): ",
    genre_prompt: "What genres do you vibe with? (1-3, comma-separated): ",
    genre_empty: "Oops, you didn't type anything! Give me at least one genre.",
    genre_count: "Whoa there! I can handle 1 to 3 genres, no more, no less!",
    genre_invalid: "Hmm, I don't recognize: ",
    genre_allowed: "I only speak these genres: ",
    genre_dup: "You listed the same genre twice. I like your enthusiasm, but let's keep them unique!",

    book_prompt: "Name 2-3 books you absolutely love (comma-separated): ",
    book_empty: "Oops, you didn't type anything! Tell me about some books you love.",
    book_injection: "Nice try, but that doesn't look like a book title to me!",
    book_count: "I need exactly 2 or 3 books, no more, no less!",
    book_invalid: "Hmm, these don't look like real titles: ",
    book_invalid_limit: ". Book titles should have actual words and be under {max} characters.",

    fam_header: "How adventurous are you feeling today?",
    fam_options: [
        "  1 = Play it safe",
        "  2 = Mostly classics, maybe one wild card",
        "  3 = Half-and-half: familiar + fresh",
        "  4 = Surprise me!",
    ],
    fam_prompt: "Pick a number (1-4): ",
    fam_empty: "Oops, you left that blank! Just type a number from 1 to 4.",
    fam_nan: "That's not a number! I need a digit between 1 and 4.",
    fam_range: "I can only count to 4 on this one. Pick 1, 2, 3, or 4.",

    rec_header: "Ta-da! Here are your BookBot picks:",
    searching: "Rummaging through the shelves...",
    attempt_suffix: " (attempt {n}/{max})",
    retry_llm: "Something went wrong with the LLM. Retrying...",
    retry_parse: "Could not parse LLM response. Retrying...",
    retry_validate: "Those recommendations didn't pass my quality check. One more try...",
    fail_all: "Sorry, BookBot couldn't generate valid recommendations right now.",
    fail_later: "Please try again later.",
    fail_duplicates: "I keep coming up with books you've already seen.",
    fail_auth: "The LLM provider rejected the API key. Check your configuration.",
    cancelled: "Cancelled.",
    more_prompt: "Would you like more recommendations? (yes / no): ",
    more_yes: "Good choice! Let me dig up more...",
    more_no: "Happy reading! Come back any time you need a fresh stack :D",
    more_invalid: "Please type 'yes' or 'no'.",
    bye: "Bye!",
};

static ZH: Messages = Messages {
    lang_prompt: LANG_PROMPT,
    lang_option_1: LANG_OPTION_1,
    lang_option_2: LANG_OPTION_2,
    lang_input: LANG_INPUT,
    lang_invalid: LANG_INVALID,

    welcome: "你好！我是 BookBot，你的私人荐书助手。一起来找下一本好书吧！",

    genre_list: "可选类型：",
    genre_prompt: "你喜欢哪些类型？（1-3个，用逗号分隔）: ",
    genre_empty: "哎呀，你什么都没输入！请至少选一个类型。",
    genre_count: "我只能处理 1 到 3 个类型哦！",
    genre_invalid: "嗯，我不认识这些: ",
    genre_allowed: "目前支持的类型：",
    genre_dup: "你重复选了同一个类型。热情我理解，但请保持每个类型都不同哦！",

    book_prompt: "说出 2-3 本你超爱的书（用逗号分隔）: ",
    book_empty: "哎呀，你什么都没输入！告诉我你喜欢的书吧。",
    book_injection: "这看起来不太像书名哦！",
    book_count: "我需要 2 到 3 本书，不多不少！",
    book_invalid: "嗯，这些看起来不像真正的书名: ",
    book_invalid_limit: "。书名应包含实际文字且不超过 {max} 个字符。",

    fam_header: "你偏向哪种推荐风格",
    fam_options: [
        "  1 = 稳妥一点，经典和畅销书优先",
        "  2 = 基本稳妥，偶尔来个冷门",
        "  3 = 一半熟悉一半新鲜",
        "  4 = 给我惊喜！来点意外的，冷门的，小众的，不常见的书",
    ],
    fam_prompt: "选一个数字（1-4）: ",
    fam_empty: "诶，你什么都没输入呀！请输入 1 到 4 之间的数字。",
    fam_nan: "哎呀，这不是数字嘛！请输入 1 到 4 之间的数字。",
    fam_range: "只能选 1、2、3 或 4 哦。",

    rec_header: "当当当！这是我为你精选的书单：",
    searching: "马上就来！正在翻阅书架...",
    attempt_suffix: "（第 {n}/{max} 次）",
    retry_llm: "LLM 出了点问题，正在重试...",
    retry_parse: "无法解析 LLM 的回复，正在重试...",
    retry_validate: "哎呀，这些推荐没通过质量检查，再试一次...",
    fail_all: "抱歉，我暂时无法生成有效的推荐。",
    fail_later: "请稍后再试。",
    fail_duplicates: "我想到的书你都已经看过推荐了。",
    fail_auth: "LLM 服务拒绝了 API 密钥，请检查配置。",
    cancelled: "已取消。",
    more_prompt: "还想要更多推荐吗？（是 / 否）: ",
    more_yes: "好的！让我再找找...",
    more_no: "祝你阅读愉快！欢迎随时回来找我推荐新书 :D",
    more_invalid: "请输入'是'或'否'。",
    bye: "再见！",
};

impl Messages {
    /// Table for `language`
    pub fn for_language(language: Language) -> &'static Messages {
        match language {
            Language::En => &EN,
            Language::Zh => &ZH,
        }
    }

    pub fn genre_list(&self, genres: &str) -> String {
        format!("{}{}", self.genre_list, genres)
    }

    pub fn genre_invalid(&self, invalid: &str) -> String {
        format!("{}{}", self.genre_invalid, invalid)
    }

    pub fn genre_allowed(&self, genres: &str) -> String {
        format!("{}{}", self.genre_allowed, genres)
    }

    pub fn book_invalid(&self, bad: &str, max_chars: usize) -> String {
        format!(
            "{}{}{}",
            self.book_invalid,
            bad,
            self.book_invalid_limit.replace("{max}", &max_chars.to_string())
        )
    }

    /// Spinner text for an attempt; the counter is only shown on retries
    pub fn searching_attempt(&self, attempt: usize, max_attempts: usize) -> String {
        if attempt <= 1 {
            return self.searching.to_string();
        }
        let suffix = self
            .attempt_suffix
            .replace("{n}", &attempt.to_string())
            .replace("{max}", &max_attempts.to_string());
        format!("{}{}", self.searching, suffix)
    }
}
