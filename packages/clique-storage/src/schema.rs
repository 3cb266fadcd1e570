pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_profiles.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_profiles.sql")),
				"tables/002_sessions.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_sessions.sql")),
				"tables/003_quests.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_quests.sql")),
				"tables/004_quest_constraints.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_quest_constraints.sql")),
				"tables/005_quest_personality_affinities.sql" => out.push_str(include_str!(
					"../../../sql/tables/005_quest_personality_affinities.sql"
				)),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
