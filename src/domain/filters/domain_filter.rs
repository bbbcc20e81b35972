// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// 顶级域名白名单
///
/// 以精确度换召回率：TLD 不在表内的域名形状字符串一律拒绝。
/// 覆盖通用、国家地区、品牌与多语种顶级域名。
static DOMAIN_TLDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // 常见通用顶级域名
        "com", "net", "org", "edu", "gov", "mil", "int", "info", "biz", "name", "pro",
        "mobi", "app", "io", "co", "me", "tv", "xyz", "site", "online", "store", "shop",
        "tech", "dev", "ai", "cloud", "digital", "live", "blog", "art", "design", "game",
        // 国家和地区顶级域名
        "cn", "us", "uk", "ca", "au", "de", "fr", "jp", "ru", "br", "in", "it", "es", "nl",
        "se", "no", "dk", "fi", "ch", "at", "be", "ie", "nz", "sg", "hk", "tw", "kr", "za",
        "mx", "ar", "cl", "pe", "ve", "ec", "py", "uy", "bo", "cr", "cu", "do", "gt",
        "hn", "ni", "pa", "sv", "ae", "il", "sa", "qa", "kw", "bh", "om", "jo", "lb", "eg",
        "ma", "dz", "tn", "ly", "ng", "ke", "gh", "ci", "cm", "ug", "tz", "et", "mu", "mg",
        "na", "zw", "zm", "mz", "ao", "cd", "cg", "ga", "gm", "ml", "sn", "so", "td", "tg",
        "bj", "bf", "cv", "gn", "gw", "lr", "mr", "ne", "sl", "st", "ph", "my", "th", "vn",
        "id", "pk", "bd", "np", "lk", "mm", "kh", "la", "mn", "bt", "mv", "bn", "tl", "tp",
        "pg", "fj", "sb", "vu", "nr", "pw", "to", "ws", "ck", "nu", "tk", "fm", "mh", "mp",
        "gu", "as", "cx", "cc", "nf", "nc", "pf", "wf", "ki", "ua", "by", "md", "am",
        "az", "ge", "kz", "kg", "tj", "tm", "uz",
        // 特殊顶级域名
        "eu", "asia", "travel", "museum", "jobs", "coop", "aero", "cat", "tel", "post", "arpa",
        // 常用商业与主题顶级域名
        "top", "vip", "club", "team", "company", "network", "group", "agency", "academy",
        "school", "university", "college", "institute", "foundation", "center", "community",
        "church", "city", "town", "zone", "ninja", "guru", "expert", "consulting", "management",
        "partners", "lawyer", "legal", "doctor", "health", "care", "hospital", "clinic", "dental",
        "pharmacy", "fitness", "restaurant", "cafe", "bar", "pub", "hotel", "tours",
        "vacations", "holiday", "fashion", "clothing", "shoes", "jewelry", "watch", "beauty",
        "makeup", "cosmetics", "furniture", "home", "garden", "kitchen", "pet", "baby", "kids",
        "toys", "gift", "photo", "photography", "video", "film", "movie", "music", "band", "dance",
        "theater", "gallery", "book", "magazine", "news", "press", "media",
        "marketing", "seo", "ads", "advertising", "market", "sale", "discount", "deal", "hosting",
        "server", "systems", "technology", "software", "code", "crypto", "bitcoin",
        "blockchain", "token", "nft", "dao", "finance", "bank", "money", "invest", "investment",
        "fund", "capital", "wealth", "tax", "insurance", "mortgage", "loan", "credit", "card",
        "pay", "cash", "mall", "buy", "auction", "bid", "win", "prize",
        "award", "play", "fun", "bet", "casino", "poker", "sport", "sports",
        "league", "fan", "racing", "run", "golf", "tennis", "soccer", "football",
        "basketball", "baseball", "hockey", "yoga", "gym", "fit", "diet", "food",
        "recipe", "cook", "cooking", "chef", "wine", "beer", "coffee", "tea", "juice", "water",
        "drink", "party", "event", "wedding", "dating", "singles", "love",
        "sex", "porn", "xxx", "adult", "chat", "talk", "meet", "date", "match", "social",
        "forum",
        // a 开头的顶级域名
        "aaa", "aarp", "abb", "abbott", "abbvie", "abc", "able", "abogado", "abudhabi",
        "ac", "accenture", "accountant", "accountants", "aco", "actor", "ad",
        "aeg", "aetna", "af", "afl", "africa", "ag",
        "agakhan", "aig", "airbus", "airforce", "airtel", "akdn", "al",
        "alibaba", "alipay", "allfinanz", "allstate", "ally", "alsace", "alstom",
        "amazon", "americanexpress", "americanfamily", "amex", "amfam", "amica", "amsterdam",
        "analytics", "android", "anquan", "anz", "aol", "apartments", "apple",
        "aq", "aquarelle", "arab", "aramco", "archi", "army", "arte",
        "asda", "associates", "athleta", "attorney",
        "audi", "audible", "audio", "auspost", "author", "auto", "autos", "aw", "aws",
        "ax", "axa", "azure",
        // b 开头的顶级域名
        "ba", "baidu", "banamex", "barcelona", "barclaycard",
        "barclays", "barefoot", "bargains", "bauhaus", "bayern",
        "bb", "bbc", "bbt", "bbva", "bcg", "bcn", "beats", "berlin", "best", "bestbuy",
        "bharti", "bi", "bible", "bike", "bing", "bingo", "bio", "black", "blackfriday",
        "blockbuster", "bloomberg", "blue", "bm", "bms", "bmw", "bnpparibas",
        "boats", "boehringer", "bofa", "bom", "bond", "boo", "booking",
        "bosch", "bostik", "boston", "bot", "boutique", "box", "bradesco",
        "bridgestone", "broadway", "broker", "brother", "brussels", "bs", "build",
        "builders", "business", "buzz", "bv", "bw", "bz", "bzh",
        // c 开头的顶级域名
        "cab", "cal", "call", "calvinklein", "cam", "camera", "camp",
        "canon", "capetown", "capitalone", "car", "caravan", "cards",
        "career", "careers", "cars", "casa", "case", "catering",
        "catholic", "cba", "cbn", "cbre", "ceo", "cern", "cf",
        "cfa", "cfd", "chanel", "channel", "charity", "chase",
        "cheap", "chintai", "christmas", "chrome", "cipriani", "circle",
        "cisco", "citadel", "citi", "citic", "claims", "cleaning",
        "click", "clinique", "clubmed",
        "coach", "codes", "cologne", "commbank",
        "compare", "computer", "comsec", "condos", "construction",
        "contact", "contractors", "cool", "corsica",
        "country", "coupon", "coupons", "courses", "cpa", "creditcard",
        "creditunion", "cricket", "crown", "crs", "cruise", "cruises", "cuisinella",
        "cw", "cy", "cymru", "cyou", "cz",
        // d 开头的顶级域名
        "dad", "data", "datsun", "day", "dclk", "dds",
        "dealer", "deals", "degree", "delivery", "dell", "deloitte", "delta",
        "democrat", "dentist", "desi", "dhl", "diamonds",
        "direct", "directory", "discover", "dish", "diy",
        "dj", "dm", "dnp", "docs", "dog", "domains", "dot",
        "download", "drive", "dtv", "dubai", "dunlop", "dupont", "durban", "dvag",
        "dvr",
        // e 开头的顶级域名
        "earth", "eat", "eco", "edeka", "education", "ee", "email",
        "emerck", "energy", "engineer", "engineering", "enterprises", "epson", "equipment",
        "er", "ericsson", "erni", "esq", "estate", "eurovision",
        "eus", "events", "exchange", "exposed", "express", "extraspace",
        // f 开头的顶级域名
        "fage", "fail", "fairwinds", "faith", "family", "fans", "farm", "farmers",
        "fast", "fedex", "feedback", "ferrari", "ferrero", "fidelity",
        "fido", "final", "financial", "fire", "firestone", "firmdale",
        "fish", "fishing", "fk", "flickr", "flights", "flir",
        "florist", "flowers", "fly", "fo", "foo", "ford",
        "forex", "forsale", "fox", "free", "fresenius",
        "frl", "frogans", "frontier", "ftr", "fujitsu", "futbol", "fyi",
        // g 开头的顶级域名
        "gal", "gallo", "gallup", "games", "gap",
        "gay", "gb", "gbiz", "gd", "gdn", "gea", "gent", "genting", "george",
        "gf", "gg", "ggee", "gi", "gifts", "gives", "giving", "gl",
        "glass", "gle", "global", "globo", "gmail", "gmbh", "gmo", "gmx",
        "godaddy", "gold", "goldpoint", "goo", "goodyear", "goog", "google",
        "gop", "got", "gp", "gq", "gr", "grainger", "graphics", "gratis",
        "green", "gripe", "grocery", "gs", "gucci", "guge",
        "guide", "guitars", "gy",
        // h 开头的顶级域名
        "hair", "hamburg", "hangout", "haus", "hbo", "hdfc", "hdfcbank",
        "healthcare", "helsinki", "here", "hermes", "hiphop", "hisamitsu",
        "hitachi", "hiv", "hkt", "hm", "holdings",
        "homedepot", "homegoods", "homes", "homesense", "honda", "horse",
        "host", "hot", "hotels", "hotmail", "house", "how", "hr", "hsbc",
        "ht", "hu", "hughes", "hyatt", "hyundai",
        // i 开头的顶级域名
        "ibm", "icbc", "ice", "icu", "ieee", "ifm", "ikano", "im",
        "imamat", "imdb", "immo", "immobilien", "inc", "industries", "infiniti",
        "ing", "ink", "insure", "international",
        "intuit", "investments", "ipiranga", "iq", "ir", "irish", "is", "ismaili",
        "ist", "istanbul", "itau", "itv",
        // j 开头的顶级域名
        "jaguar", "java", "jcb", "je", "jeep", "jetzt", "jio", "jll", "jm",
        "jmp", "jnj", "joburg", "jot", "joy", "jpmorgan", "jprs",
        "juegos", "juniper",
        // k 开头的顶级域名
        "kaufen", "kddi", "kerryhotels", "kerryproperties", "kfh",
        "kia", "kim", "kindle", "kiwi", "km", "kn", "koeln",
        "komatsu", "kosher", "kp", "kpmg", "kpn", "krd", "kred", "kuokgroup",
        "ky", "kyoto",
        // l 开头的顶级域名
        "lacaixa", "lamborghini", "lamer", "land", "landrover", "lanxess",
        "lasalle", "lat", "latino", "latrobe", "law", "lc", "lds",
        "lease", "leclerc", "lefrak", "lego", "lexus", "lgbt", "li", "lidl",
        "life", "lifeinsurance", "lifestyle", "lighting", "like", "lilly", "limited",
        "limo", "lincoln", "link", "living", "llc", "llp",
        "loans", "locker", "locus", "lol", "london", "lotte", "lotto", "lpl",
        "lplfinancial", "ls", "lt", "ltd", "ltda", "lu", "lundbeck", "luxe",
        "luxury", "lv",
        // m 开头的顶级域名
        "madrid", "maif", "maison", "man", "mango",
        "map", "markets", "marriott", "marshalls", "mattel",
        "mba", "mc", "mckinsey", "med", "melbourne",
        "meme", "memorial", "men", "menu", "merckmsd", "miami", "microsoft",
        "mini", "mint", "mit", "mitsubishi", "mk", "mlb", "mls",
        "mma", "mo", "mobile", "moda", "moe", "moi", "mom", "monash",
        "monster", "mormon", "moscow", "moto", "motorcycles",
        "mov", "mq", "ms", "msd", "mt", "mtn", "mtr",
        "mw",
        // n 开头的顶级域名
        "nab", "nagoya", "navy", "nba", "nec",
        "netbank", "netflix", "neustar", "new", "next", "nextdirect",
        "nexus", "nfl", "ngo", "nhk", "nico", "nike", "nikon",
        "nissan", "nissay", "nokia", "norton", "now", "nowruz",
        "nowtv", "nra", "nrw", "ntt", "nyc",
        // o 开头的顶级域名
        "obi", "observer", "office", "okinawa", "olayan", "olayangroup", "ollo",
        "omega", "one", "ong", "onl", "ooo", "open", "oracle", "orange",
        "organic", "origins", "osaka", "otsuka", "ott", "ovh",
        // p 开头的顶级域名
        "page", "panasonic", "paris", "pars", "parts",
        "pccw", "pfizer", "phd",
        "philips", "phone", "photos", "physio", "pics", "pictet",
        "pictures", "pid", "pin", "ping", "pink", "pioneer", "pizza", "pl",
        "place", "playstation", "plumbing", "plus", "pm", "pn", "pnc", "pohl",
        "politie", "pr", "praxi", "prime",
        "prod", "productions", "prof", "progressive", "promo", "properties", "property",
        "protection", "pru", "prudential", "ps", "pt", "pwc",
        // q 开头的顶级域名
        "qpon", "quebec", "quest",
        // r 开头的顶级域名
        "radio", "re", "read", "realestate", "realtor", "realty", "recipes",
        "red", "redstone", "redumbrella", "rehab", "reise", "reisen", "reit", "reliance",
        "ren", "rent", "rentals", "repair", "report", "republican", "rest",
        "review", "reviews", "rexroth", "rich", "richardli", "ricoh", "ril", "rio",
        "rip", "ro", "rocks", "rodeo", "rogers", "room", "rs", "rsvp", "rugby",
        "ruhr", "rw", "rwe", "ryukyu",
        // s 开头的顶级域名
        "saarland", "safe", "safety", "sakura", "salon", "samsclub",
        "samsung", "sandvik", "sandvikcoromant", "sanofi", "sap", "sarl", "sas",
        "save", "saxo", "sbi", "sbs", "sc", "scb", "schaeffler", "schmidt",
        "scholarships", "schule", "schwarz", "science", "scot", "sd",
        "search", "seat", "secure", "security", "seek", "select", "sener", "services",
        "seven", "sew", "sexy", "sfr", "sh", "shangrila", "sharp",
        "shell", "shia", "shiksha", "shopping", "shouji", "show",
        "si", "silk", "sina", "sj", "sk", "ski", "skin", "sky",
        "skype", "sling", "sm", "smart", "smile", "sncf",
        "softbank", "sohu", "solar", "solutions", "song", "sony",
        "soy", "spa", "space", "spot", "sr", "srl", "ss", "stada",
        "staples", "star", "statebank", "statefarm", "stc", "stcgroup", "stockholm",
        "storage", "stream", "studio", "study", "style", "su", "sucks",
        "supplies", "supply", "support", "surf", "surgery", "suzuki", "swatch",
        "swiss", "sx", "sy", "sydney", "sz",
        // t 开头的顶级域名
        "tab", "taipei", "taobao", "target", "tatamotors", "tatar", "tattoo",
        "taxi", "tc", "tci", "tdk", "temasek", "teva", "tf",
        "thd", "theatre", "tiaa", "tickets", "tienda", "tips", "tires", "tirol",
        "tjmaxx", "tjx", "tkmaxx", "tm", "tmall", "today", "tokyo", "tools",
        "toray", "toshiba", "total", "toyota", "tr",
        "trade", "trading", "training", "travelers", "travelersinsurance",
        "trust", "trv", "tt", "tube", "tui", "tunes", "tushu", "tvs",
        // u 开头的顶级域名
        "ubank", "ubs", "ug", "unicom", "uno", "uol", "ups",
        // v 开头的顶级域名
        "va", "vana", "vanguard", "vc", "vegas", "ventures",
        "verisign", "versicherung", "vet", "vg", "vi", "viajes", "vig",
        "viking", "villas", "vin", "virgin", "visa", "vision", "viva", "vivo",
        "vlaanderen", "vodka", "volvo", "vote", "voting", "voto", "voyage",
        // w 开头的顶级域名
        "wales", "walmart", "walter", "wang", "wanggou", "watches", "weather",
        "weatherchannel", "webcam", "weber", "website", "wed", "weibo", "weir",
        "whoswho", "wien", "wiki", "williamhill", "windows", "wine",
        "winners", "wme", "wolterskluwer", "woodside", "work", "works", "world", "wow",
        "wtc", "wtf",
        // x 开头的顶级域名
        "xbox", "xerox", "xihuan", "xin",
        // y 开头的顶级域名
        "yachts", "yahoo", "yamaxun", "yandex", "ye", "yodobashi", "yokohama",
        "you", "youtube", "yt", "yun",
        // z 开头的顶级域名
        "zappos", "zara", "zero", "zip", "zuerich",
        // 其他语种顶级域名
        "xn--p1ai", "xn--80asehdb", "xn--80aswg", "xn--j1amh", "xn--90ais",
    ]
    .into_iter()
    .collect()
});

/// 静态资源后缀黑名单：形似 TLD 的文件扩展名
static INVALID_SUFFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "js", "css", "html", "htm", "php", "asp", "aspx", "jsp", "png", "jpg", "jpeg",
        "gif", "bmp", "ico", "svg", "webp", "mp3", "mp4", "avi", "mov", "wmv", "flv",
        "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar", "tar", "gz",
        "json", "xml", "txt", "log", "md", "scss", "less", "ts", "tsx", "jsx", "vue",
        "woff", "woff2", "ttf", "eot", "otf", "swf", "map",
    ]
    .into_iter()
    .collect()
});

/// 域名标签序列基本形状
static DOMAIN_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+([\-.][a-z0-9]+)*\.[a-z0-9\-]+$").expect("valid pattern"));

/// 点分四段 IPv4 形状
static IPV4_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").expect("valid pattern"));

/// 数字开头的非 IP 序列（如坐标、版本号）
static NUMERIC_LEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+").expect("valid pattern"));

/// 国内手机号运营商号段
///
/// 移动 134-139/147-148/150-152/157-159/165/172/178/182-184/187-188/195/197-198，
/// 联通 130-132/145-146/155-156/166-167/171/175-176/185-186/196，
/// 电信 133/149/153/173-174/177/180-181/189/191/193/199，广电 192
static CN_CARRIER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^1(3[0-9]|4[5-9]|5[0-35-9]|6[25-7]|7[0-8]|8[0-9]|9[135-9])")
        .expect("valid pattern")
});

/// 邮箱结构形状
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid pattern")
});

/// 递增递减数字序列前缀
static SEQUENTIAL_RUNS: &[&str] = &["0123456789", "1234567890", "9876543210", "0987654321"];

/// 规范化域名候选
///
/// 转小写并剥离协议、`www.` 前缀、路径、查询、锚点与端口。
pub fn normalize_domain(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let mut rest = lower.as_str();
    for prefix in ["https://", "http://", "ftps://", "ftp://"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }
    if let Some(stripped) = rest.strip_prefix("www.") {
        rest = stripped;
    }
    rest.split(['/', '?', '#', ':'])
        .next()
        .unwrap_or("")
        .to_string()
}

/// 域名是否有效
///
/// 规范化后做结构检查，点分四段 IPv4 作为例外直接接受，
/// 其余要求末级标签在 TLD 白名单内且不是资源文件后缀。
pub fn is_valid_domain(raw: &str) -> bool {
    let domain = normalize_domain(raw);
    if domain.len() < 3 {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return false;
    }
    if !domain.contains('.') {
        return false;
    }
    if IPV4_SHAPE.is_match(&domain) {
        return true;
    }
    if !DOMAIN_SHAPE.is_match(&domain) {
        return false;
    }
    let tld = domain.rsplit('.').next().unwrap_or("");
    if tld.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if INVALID_SUFFIXES.contains(tld) {
        return false;
    }
    if tld.len() < 2 || tld.len() > 63 {
        return false;
    }
    if !DOMAIN_TLDS.contains(tld) {
        return false;
    }
    if NUMERIC_LEAD.is_match(&domain) {
        return false;
    }
    true
}

/// 国内手机号是否有效
///
/// 剥离非数字字符与 0086/86 国家码，保留末 11 位，
/// 要求 1 开头且命中运营商号段。
pub fn is_valid_chinese_phone(phone: &str) -> bool {
    let mut digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if let Some(rest) = digits.strip_prefix("0086") {
        digits = rest.to_string();
    } else if let Some(rest) = digits.strip_prefix("86") {
        digits = rest.to_string();
    }
    if digits.len() > 11 {
        digits = digits[digits.len() - 11..].to_string();
    }
    if digits.len() != 11 || !digits.starts_with('1') {
        return false;
    }
    CN_CARRIER_PREFIX.is_match(&digits)
}

/// 国际手机号是否有效
///
/// 纯数字长度 8-15，拒绝全同数字、顺序数字、小数形式
/// 以及分隔符使用不合理的候选。
pub fn is_valid_international_phone(phone: &str) -> bool {
    let digits: String = phone
        .trim_start_matches('+')
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if digits.len() < 7 || digits.len() > 15 {
        return false;
    }
    let first = match digits.chars().next() {
        Some(c) => c,
        None => return false,
    };
    // 全相同数字（含全 0、全 1）
    if digits.chars().all(|c| c == first) {
        return false;
    }
    if SEQUENTIAL_RUNS.iter().any(|run| digits.starts_with(run)) {
        return false;
    }
    // 小数形式更可能是坐标或版本号
    if phone.contains('.') {
        return false;
    }
    if phone.contains('-') {
        if phone.matches('-').count() > 3 {
            return false;
        }
        for part in phone.split('-') {
            let part = part.trim_start_matches('+');
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return false;
            }
        }
    }
    if digits.len() < 8 {
        return false;
    }
    true
}

/// 邮箱是否有效
///
/// 结构匹配后，域名部分必须通过域名校验。
pub fn is_valid_email(email: &str) -> bool {
    if !EMAIL_SHAPE.is_match(email) {
        return false;
    }
    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    if local.len() > 64 {
        return false;
    }
    is_valid_domain(domain)
}

/// 过滤域名列表，返回规范化且去重后的有效域名
pub fn filter_domains<'a, I>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut valid = Vec::new();
    for raw in domains {
        let cleaned = normalize_domain(raw);
        if cleaned.len() < 3 || !cleaned.contains('.') {
            continue;
        }
        // 浏览器存储 API 的字面产物
        if cleaned.contains("localstorage")
            || cleaned.contains("sessionstorage")
            || cleaned.contains("indexeddb")
            || cleaned.contains("webkitstorage")
        {
            continue;
        }
        if is_valid_domain(&cleaned) && seen.insert(cleaned.clone()) {
            valid.push(cleaned);
        }
    }
    valid
}

/// 过滤手机号列表
///
/// `domestic_only` 为真时仅保留国内号段，否则国内或国际
/// 任一路径通过即保留。
pub fn filter_phones<'a, I>(phones: I, domestic_only: bool) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    phones
        .into_iter()
        .filter(|phone| {
            if domestic_only {
                is_valid_chinese_phone(phone)
            } else {
                is_valid_chinese_phone(phone) || is_valid_international_phone(phone)
            }
        })
        .map(|phone| phone.to_string())
        .collect()
}

/// 过滤邮箱列表
pub fn filter_emails<'a, I>(emails: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    emails
        .into_iter()
        .filter(|email| is_valid_email(email))
        .map(|email| email.to_string())
        .collect()
}
