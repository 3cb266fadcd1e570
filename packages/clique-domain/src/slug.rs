use regex::Regex;

pub const MAX_SLUG_CHARS: usize = 64;
pub const FALLBACK_SLUG: &str = "quest";

pub fn slugify(title: &str) -> String {
	let lowered = title.to_lowercase();
	let replaced = Regex::new(r"[^a-z0-9]+")
		.map(|re| re.replace_all(&lowered, "-").into_owned())
		.unwrap_or(lowered);
	let mut slug: String = replaced.trim_matches('-').chars().take(MAX_SLUG_CHARS).collect();

	while slug.ends_with('-') {
		slug.pop();
	}

	if slug.is_empty() { FALLBACK_SLUG.to_string() } else { slug }
}

/// The `n`th candidate for a slug: the base itself first, then `base-2`, `base-3`, ...
pub fn with_suffix(base: &str, n: u32) -> String {
	if n <= 1 {
		return base.to_string();
	}

	let suffix = format!("-{n}");
	let keep = MAX_SLUG_CHARS.saturating_sub(suffix.len());
	let mut head: String = base.chars().take(keep).collect();

	while head.ends_with('-') {
		head.pop();
	}

	format!("{head}{suffix}")
}
