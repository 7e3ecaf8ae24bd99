use crate::config::VfsConfig;
use crate::core_vfs::node::{FsNode, Vfs};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// A directory of the fixed skeleton the tree is grown from.
struct DirTemplate {
    name: &'static str,
    subdirs: &'static [DirTemplate],
}

const fn dir(name: &'static str, subdirs: &'static [DirTemplate]) -> DirTemplate {
    DirTemplate { name, subdirs }
}

const SKELETON: &[DirTemplate] = &[
    dir(
        "documents",
        &[
            dir("passwords", &[]),
            dir("backups", &[]),
            dir("records", &[dir("bank", &[]), dir("bitcoin", &[])]),
            dir("harmony", &[]),
            dir("echo", &[]),
            dir("legacy", &[]),
        ],
    ),
    dir(
        "pictures",
        &[
            dir("private", &[]),
            dir("wedding_2023", &[]),
            dir("secret", &[]),
        ],
    ),
    dir("downloads", &[dir("Usenet", &[]), dir("Torrents", &[])]),
    dir("applications", &[dir("games", &[])]),
];

const FILE_SIZES: &[u64] = &[
    69,
    6969,
    69696969,
    420,
    420420,
    420420420420,
    42069,
    69420,
    6942069,
];

const ADJECTIVES: &[&str] = &[
    "quick", "happy", "bright", "silent", "mellow", "brisk", "calm", "clever", "daring",
    "elegant", "fancy", "gentle", "jolly", "lively", "polite", "quiet", "rapid", "shiny",
    "smiling", "witty",
];

const PICTURE_NOUNS: &[&str] = &[
    "sunset", "mountain", "beach", "forest", "cityscape", "portrait", "landscape", "snapshot",
    "selfie", "reflection", "vista", "waterfall", "garden", "skyline", "horizon",
];
const PICTURE_EXTS: &[&str] = &[".jpg", ".png", ".gif", ".bmp"];

const DOCUMENT_NOUNS: &[&str] = &[
    "report", "proposal", "memo", "summary", "draft", "invoice", "agenda", "minutes", "letter",
    "notes", "analysis", "blueprint", "plan", "overview", "abstract", "manual", "document",
    "research", "file", "paper",
];
const DOCUMENT_EXTS: &[&str] = &[".doc", ".pdf", ".txt", ".rtf", ".odt"];

const DOWNLOAD_NOUNS: &[&str] = &[
    "installer", "update", "package", "archive", "setup", "bundle", "release", "version",
    "patch", "module", "download", "resource", "addon", "toolkit", "driver", "script",
    "library", "binary", "compiler", "framework",
];
const DOWNLOAD_EXTS: &[&str] = &[".zip", ".rar", ".exe", ".msi", ".tar.gz"];

const APPLICATION_NOUNS: &[&str] = &[
    "calculator", "editor", "notepad", "browser", "player", "manager", "tracker", "organizer",
    "viewer", "mailer", "converter", "explorer", "designer", "scheduler", "recorder",
    "terminal", "dashboard", "monitor", "assistant", "studio",
];
const APPLICATION_EXTS: &[&str] = &[".app", ".exe", ".bin"];

const GAME_NOUNS: &[&str] = &[
    "adventure", "quest", "battle", "arena", "saga", "challenge", "odyssey", "mission",
    "struggle", "duel", "clash", "legend", "racer", "fighter", "hero", "escape", "survival",
    "chronicle", "empire", "fantasy",
];
const GAME_EXTS: &[&str] = &[".game", ".bin", ".rom", ".iso", ""];

const VIDEO_MOODS: &[&str] = &[
    "Unedited", "Raw", "Lost", "Complete", "Final", "Uncut", "Secret", "Old", "Best of",
    "Leftover",
];
const VIDEO_EVENTS: &[&str] = &[
    "Birthday Party", "Road Trip", "Graduation", "Camping Weekend", "Office Party",
    "Reunion", "Christmas Morning", "Beach Day", "Concert", "Rehearsal Dinner",
];
const VIDEO_PLACES: &[&str] = &[
    "at the Lake", "in Vegas", "at Grandma's", "in the Garage", "at the Cabin", "Downtown",
    "on the Boat", "in Cancun",
];
const VIDEO_EXTS: &[&str] = &[".mp4", ".avi", ".mkv", ".flv", ".wmv"];

/// Which word pool a directory draws its file names from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Documents,
    Pictures,
    Downloads,
    Applications,
    Games,
    Videos,
}

impl Category {
    /// Picks the pool for a directory. The directory name wins for `games`
    /// and `private`; otherwise the top-level directory decides.
    fn for_directory(name: &str, path: &str) -> Self {
        if name.eq_ignore_ascii_case("private") {
            return Category::Videos;
        }
        if name.eq_ignore_ascii_case("games") {
            return Category::Games;
        }
        match path.split('/').find(|segment| !segment.is_empty()) {
            Some("pictures") => Category::Pictures,
            Some("downloads") => Category::Downloads,
            Some("applications") => Category::Applications,
            _ => Category::Documents,
        }
    }

    fn pools(self) -> (&'static [&'static str], &'static [&'static str]) {
        match self {
            Category::Documents | Category::Videos => (DOCUMENT_NOUNS, DOCUMENT_EXTS),
            Category::Pictures => (PICTURE_NOUNS, PICTURE_EXTS),
            Category::Downloads => (DOWNLOAD_NOUNS, DOWNLOAD_EXTS),
            Category::Applications => (APPLICATION_NOUNS, APPLICATION_EXTS),
            Category::Games => (GAME_NOUNS, GAME_EXTS),
        }
    }
}

/// Converts a title into a lowercase, hyphen-separated file name stem.
pub fn convert_to_slug(title: &str) -> String {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    static HYPHENS: OnceLock<Regex> = OnceLock::new();
    let invalid = INVALID.get_or_init(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
    let hyphens = HYPHENS.get_or_init(|| Regex::new(r"-+").unwrap());

    let slug = title.to_lowercase();
    let slug = invalid.replace_all(&slug, "");
    let slug = slug.replace(' ', "-");
    let slug = hyphens.replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}

/// Grows the synthetic directory tree served to every session.
pub struct VfsGenerator {
    rng: StdRng,
    min_files: usize,
    max_files: usize,
}

impl VfsGenerator {
    pub fn new(config: &VfsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            min_files: config.min_files,
            max_files: config.max_files.max(config.min_files),
        }
    }

    pub fn build(mut self) -> Vfs {
        let root = self.build_directory("/", SKELETON, "/");
        let vfs = Vfs::new(root);
        info!("Virtual filesystem ready with {} nodes.", vfs.node_count());
        vfs
    }

    fn build_directory(&mut self, name: &str, subdirs: &[DirTemplate], path: &str) -> FsNode {
        let mut children: Vec<FsNode> = subdirs
            .iter()
            .map(|sub| {
                let sub_path = if path == "/" {
                    format!("/{}", sub.name)
                } else {
                    format!("{}/{}", path, sub.name)
                };
                self.build_directory(sub.name, sub.subdirs, &sub_path)
            })
            .collect();

        let category = Category::for_directory(name, path);
        let mut taken: HashSet<String> = children.iter().map(|c| c.name().to_string()).collect();
        let count = self.rng.gen_range(self.min_files..=self.max_files);
        debug!("Generating {} {:?} files in {}", count, category, path);

        for _ in 0..count {
            let file_name = self.unique_file_name(category, &taken);
            taken.insert(file_name.clone());
            let size = self.pick(FILE_SIZES);
            children.push(FsNode::file(file_name, size));
        }

        FsNode::directory(name, children)
    }

    fn unique_file_name(&mut self, category: Category, taken: &HashSet<String>) -> String {
        let mut candidate = self.file_name(category);
        for _ in 0..8 {
            if !taken.contains(&candidate) {
                return candidate;
            }
            candidate = self.file_name(category);
        }

        // Still colliding: disambiguate before the extension.
        let (stem, ext) = match candidate.find('.') {
            Some(dot) => candidate.split_at(dot),
            None => (candidate.as_str(), ""),
        };
        let mut n = 2;
        loop {
            let name = format!("{}_{}{}", stem, n, ext);
            if !taken.contains(&name) {
                return name;
            }
            n += 1;
        }
    }

    fn file_name(&mut self, category: Category) -> String {
        if category == Category::Videos {
            return self.video_file_name();
        }
        let (nouns, exts) = category.pools();
        let adjective = self.pick(ADJECTIVES);
        let noun = self.pick(nouns);
        let ext = self.pick(exts);
        let suffix: u32 = self.rng.gen_range(10..=99);
        format!("{}_{}_{}{}", adjective, noun, suffix, ext)
    }

    fn video_file_name(&mut self) -> String {
        let title = format!(
            "{} {} {} {}",
            self.pick(VIDEO_MOODS),
            self.pick(VIDEO_EVENTS),
            self.pick(VIDEO_PLACES),
            self.rng.gen_range(2009..=2024)
        );
        format!("{}{}", convert_to_slug(&title), self.pick(VIDEO_EXTS))
    }

    fn pick<T: Copy>(&mut self, choices: &[T]) -> T {
        choices[self.rng.gen_range(0..choices.len())]
    }
}
