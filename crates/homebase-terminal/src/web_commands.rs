//! Navigation commands: web search, bookmarks and site shortcuts.

use homebase_store::{BOOKMARKS_KEY, KvStore};
use homebase_types::error::Result;
use serde_json::{Map, Value};

use crate::interpreter::{Command, CommandOutput, CommandRegistry, Environment, Options};

/// Search engines by option letter. The last entry is the default.
const ENGINES: &[(char, &str, &str)] = &[
    ('y', "youtube", "https://www.youtube.com/results?search_query="),
    ('w', "wikipedia", "https://en.wikipedia.org/w/index.php?search="),
    ('d', "duckduckgo", "https://duckduckgo.com/?q="),
    ('g', "google", "https://www.google.com/search?q="),
];
const DEFAULT_ENGINE: char = 'g';

const CHAN_URL: &str = "http://4chan.org";
const REDDIT_URL: &str = "https://reddit.com/";
const LASTFM_ARTIST_URL: &str = "http://last.fm/music/";
const LASTFM_TAG_URL: &str = "http://last.fm/tag/";

/// Register web commands.
pub fn register_web_commands(reg: &mut CommandRegistry) -> Result<()> {
    reg.register(Box::new(SearchCmd::new()));
    reg.register(Box::new(BmCmd));
    reg.register_method("bm", Box::new(BmSetCmd))?;
    reg.register_method("bm", Box::new(BmRemoveCmd))?;
    reg.register_method("bm", Box::new(BmListCmd))?;
    reg.register(Box::new(ChanCmd));
    reg.register(Box::new(RedditCmd));
    reg.register(Box::new(LastfmCmd));
    Ok(())
}

fn plus_joined(query: &str) -> String {
    query.replace(' ', "+")
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

struct SearchCmd {
    help: String,
}

impl SearchCmd {
    fn new() -> Self {
        let mut help = String::from(
            "search the web\nusage: search [-OPTION] QUERY\npossible search options:",
        );
        for (flag, name, _) in ENGINES {
            help.push_str(&format!("\n  -{flag}: {name}"));
        }
        Self { help }
    }
}

impl Command for SearchCmd {
    fn name(&self) -> &str {
        "search"
    }
    fn help(&self) -> &str {
        &self.help
    }
    fn category(&self) -> &str {
        "programs"
    }
    fn execute(&self, argument: &str, options: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if argument.is_empty() {
            return Ok(CommandOutput::Text(self.help.clone()));
        }
        let flag = options
            .iter()
            .find(|opt| ENGINES.iter().any(|(f, ..)| f == opt))
            .unwrap_or(DEFAULT_ENGINE);
        let Some((_, name, base)) = ENGINES.iter().find(|(f, ..)| *f == flag) else {
            return Ok(CommandOutput::Text(self.help.clone()));
        };
        log::debug!("search {name}: {argument}");
        env.services
            .navigator
            .navigate(&format!("{base}{}", plus_joined(argument)))?;
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// bm (bookmarks)
// ---------------------------------------------------------------------------

fn load_bookmarks(store: &dyn KvStore) -> Result<Map<String, Value>> {
    Ok(match store.get(BOOKMARKS_KEY)? {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    })
}

fn save_bookmarks(store: &mut dyn KvStore, bookmarks: Map<String, Value>) -> Result<()> {
    store.set(BOOKMARKS_KEY, Value::Object(bookmarks))
}

struct BmCmd;
impl Command for BmCmd {
    fn name(&self) -> &str {
        "bm"
    }
    fn help(&self) -> &str {
        "navigate to a bookmark\nusage: bm NAME\n\
         see also: bm set, bm remove, bm list"
    }
    fn category(&self) -> &str {
        "programs"
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if argument.is_empty() {
            return Ok(CommandOutput::Text(self.help().to_string()));
        }
        let bookmarks = load_bookmarks(&*env.store)?;
        match bookmarks.get(argument) {
            Some(Value::String(url)) => {
                env.services.navigator.navigate(url)?;
                Ok(CommandOutput::Text(format!("Navigating to {argument}")))
            },
            _ => Ok(CommandOutput::Text("Bookmark not found".to_string())),
        }
    }
}

struct BmSetCmd;
impl Command for BmSetCmd {
    fn name(&self) -> &str {
        "set"
    }
    fn help(&self) -> &str {
        "add or replace a bookmark\nusage: bm set NAME LINK"
    }
    fn category(&self) -> &str {
        "programs"
    }
    fn visible(&self) -> bool {
        false
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let parts: Vec<&str> = argument.split_whitespace().collect();
        let [name, link] = parts.as_slice() else {
            return Ok(CommandOutput::Text(self.help().to_string()));
        };
        let mut bookmarks = load_bookmarks(&*env.store)?;
        bookmarks.insert((*name).to_string(), Value::String((*link).to_string()));
        save_bookmarks(&mut *env.store, bookmarks)?;
        Ok(CommandOutput::None)
    }
}

struct BmRemoveCmd;
impl Command for BmRemoveCmd {
    fn name(&self) -> &str {
        "remove"
    }
    fn help(&self) -> &str {
        "remove a bookmark\nusage: bm remove NAME"
    }
    fn category(&self) -> &str {
        "programs"
    }
    fn visible(&self) -> bool {
        false
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if argument.is_empty() {
            return Ok(CommandOutput::Text(self.help().to_string()));
        }
        let mut bookmarks = load_bookmarks(&*env.store)?;
        let Some(removed) = bookmarks.remove(argument) else {
            return Ok(CommandOutput::Text("Bookmark not found".to_string()));
        };
        save_bookmarks(&mut *env.store, bookmarks)?;
        let url = removed.as_str().map_or_else(|| removed.to_string(), str::to_string);
        Ok(CommandOutput::Text(format!("Removed bookmark '{argument}' ({url})")))
    }
}

struct BmListCmd;
impl Command for BmListCmd {
    fn name(&self) -> &str {
        "list"
    }
    fn help(&self) -> &str {
        "list all bookmarks\nusage: bm list"
    }
    fn category(&self) -> &str {
        "programs"
    }
    fn visible(&self) -> bool {
        false
    }
    fn execute(&self, _: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        let bookmarks = load_bookmarks(&*env.store)?;
        if bookmarks.is_empty() {
            return Ok(CommandOutput::Text("(no bookmarks)".to_string()));
        }
        let rows = bookmarks
            .iter()
            .map(|(name, url)| {
                let url = url.as_str().map_or_else(|| url.to_string(), str::to_string);
                vec![name.clone(), url]
            })
            .collect();
        Ok(CommandOutput::Table {
            headers: vec!["name".into(), "url".into()],
            rows,
        })
    }
}

// ---------------------------------------------------------------------------
// chan / reddit
// ---------------------------------------------------------------------------

struct ChanCmd;
impl Command for ChanCmd {
    fn name(&self) -> &str {
        "chan"
    }
    fn help(&self) -> &str {
        "navigate to 4chan or one of its boards\nusage: chan [BOARD]\nexample: chan g"
    }
    fn category(&self) -> &str {
        "programs"
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if argument.is_empty() {
            env.services.navigator.navigate(CHAN_URL)?;
            return Ok(CommandOutput::Text("Navigating to 4chan home".to_string()));
        }
        let board = if argument.starts_with('/') {
            argument.to_string()
        } else {
            format!("/{argument}")
        };
        env.services
            .navigator
            .navigate(&format!("{CHAN_URL}{board}"))?;
        Ok(CommandOutput::Text(format!("Navigating to 4chan {board}")))
    }
}

struct RedditCmd;
impl Command for RedditCmd {
    fn name(&self) -> &str {
        "reddit"
    }
    fn help(&self) -> &str {
        "navigate to reddit or a subreddit\nusage: reddit [r/SUBREDDIT]\nexample: reddit r/rust"
    }
    fn category(&self) -> &str {
        "programs"
    }
    fn execute(&self, argument: &str, _: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if argument.is_empty() {
            env.services.navigator.navigate(REDDIT_URL)?;
            return Ok(CommandOutput::Text("Navigating to reddit".to_string()));
        }
        let path = argument.trim_start_matches('/');
        env.services
            .navigator
            .navigate(&format!("{REDDIT_URL}{path}"))?;
        Ok(CommandOutput::Text(format!("Navigating to reddit {path}")))
    }
}

// ---------------------------------------------------------------------------
// lastfm
// ---------------------------------------------------------------------------

struct LastfmCmd;
impl Command for LastfmCmd {
    fn name(&self) -> &str {
        "lastfm"
    }
    fn help(&self) -> &str {
        "navigate to an artist or tag on last.fm\nusage: lastfm [-t] QUERY\n  -t: search by tag"
    }
    fn category(&self) -> &str {
        "programs"
    }
    fn execute(&self, argument: &str, options: &Options, env: &mut Environment<'_>) -> Result<CommandOutput> {
        if argument.is_empty() {
            return Ok(CommandOutput::Text(self.help().to_string()));
        }
        let base = if options.contains('t') {
            LASTFM_TAG_URL
        } else {
            LASTFM_ARTIST_URL
        };
        let query = plus_joined(argument);
        env.services.navigator.navigate(&format!("{base}{query}"))?;
        Ok(CommandOutput::Text(format!("navigating to last.fm - {query}")))
    }
}
