use crate::achievements::{achievement_icon, level_title, motivational_phrase};
use crate::calendar::{weeks, CalendarDay, CellState};
use crate::gamification::{calculate_progress, points_needed_for_next_level};
use crate::models::{Achievement, Category, Habit, HabitStats, Identity, OverallStats, UserAchievement, UserStats};
use std::collections::HashSet;
use std::fmt::Write;

pub struct DashboardPage<'a> {
    pub identity: &'a Identity,
    pub habits: &'a [Habit],
    pub overall: Option<&'a OverallStats>,
    pub user_stats: Option<&'a UserStats>,
    pub message: Option<&'a str>,
}

pub struct CalendarPage<'a> {
    pub habit: &'a Habit,
    pub days: &'a [CalendarDay],
    pub habit_stats: Option<&'a HabitStats>,
    pub message: Option<&'a str>,
}

pub struct AchievementsPage<'a> {
    pub identity: &'a Identity,
    pub catalog: &'a [Achievement],
    pub unlocked: &'a [UserAchievement],
    pub stats: Option<&'a UserStats>,
    pub message: Option<&'a str>,
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn page(title: &str, signed_in: bool, message: Option<&str>, body: &str) -> String {
    let nav = if signed_in {
        r#"<nav><a href="/">Habits</a><a href="/achievements">Achievements</a>
        <form method="post" action="/logout"><button class="link">Log out</button></form></nav>"#
    } else {
        r#"<nav><a href="/login">Log in</a><a href="/register">Register</a></nav>"#
    };
    let message = message
        .map(|text| format!(r#"<p class="message">{}</p>"#, escape_html(text)))
        .unwrap_or_default();

    LAYOUT_HTML
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{NAV}}", nav)
        .replace("{{MESSAGE}}", &message)
        .replace("{{BODY}}", body)
}

pub fn render_login(error: Option<&str>, notice: Option<&str>) -> String {
    let body = r#"<section class="card narrow">
  <h1>Welcome back</h1>
  <form method="post" action="/login" class="stack">
    <label>Username <input name="username" autocomplete="username" required /></label>
    <label>Password <input name="password" type="password" autocomplete="current-password" required /></label>
    <button type="submit">Log in</button>
  </form>
  <p class="subtitle">No account yet? <a href="/register">Register</a></p>
</section>"#;
    page("Log in", false, error.or(notice), body)
}

pub fn render_register(error: Option<&str>) -> String {
    let body = r#"<section class="card narrow">
  <h1>Create an account</h1>
  <form method="post" action="/register" class="stack">
    <label>Email <input name="email" type="email" autocomplete="email" required /></label>
    <label>Username <input name="username" autocomplete="username" required /></label>
    <label>Password <input name="password" type="password" autocomplete="new-password" required /></label>
    <button type="submit">Register</button>
  </form>
</section>"#;
    page("Register", false, error, body)
}

fn render_level_panel(stats: Option<&UserStats>) -> String {
    let Some(stats) = stats else {
        return String::new();
    };
    let progress = calculate_progress(stats.points);
    format!(
        r#"<section class="card level">
  <div><span class="label">Level {level}</span><span class="value">{title}</span></div>
  <div class="bar"><span style="width: {progress:.0}%"></span></div>
  <p class="subtitle">{points} points, {needed} to the next level. {phrase}.</p>
</section>"#,
        level = stats.level,
        title = level_title(stats.level),
        points = stats.points,
        needed = points_needed_for_next_level(stats.points),
        phrase = motivational_phrase(stats.level),
    )
}

pub fn render_dashboard(view: &DashboardPage<'_>) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<header><h1>Hi, {}</h1><p class="subtitle">{}</p></header>"#,
        escape_html(&view.identity.username),
        escape_html(&view.identity.email)
    );
    body.push_str(&render_level_panel(view.user_stats));

    if let Some(overall) = view.overall {
        let _ = write!(
            body,
            r#"<section class="panel">
  <div class="stat"><span class="label">Habits</span><span class="value">{}</span></div>
  <div class="stat"><span class="label">Active</span><span class="value">{}</span></div>
  <div class="stat"><span class="label">Completions</span><span class="value">{}</span></div>
  <div class="stat"><span class="label">Avg rate</span><span class="value">{:.0}%</span></div>
  <div class="stat"><span class="label">Best streak</span><span class="value">{}</span></div>
</section>"#,
            overall.total_habits,
            overall.active_habits,
            overall.total_completions,
            overall.average_completion_rate,
            overall.best_streak
        );
    }

    body.push_str(r#"<section class="card"><h2>Your habits</h2>"#);
    if view.habits.is_empty() {
        body.push_str(r#"<p class="subtitle">No habits yet. Add your first one below.</p>"#);
    }
    body.push_str(r#"<ul class="habits">"#);
    for habit in view.habits {
        let Some(id) = habit.id else { continue };
        let _ = write!(
            body,
            r#"<li style="border-left-color: {color}">
  <a href="/habits/{id}"><strong>{name}</strong></a>
  <span class="tag">{category}</span>
  <span class="subtitle">{goal}x per week{inactive}</span>
  <form method="post" action="/habits/{id}/delete"><button class="link">Delete</button></form>
</li>"#,
            color = escape_html(&habit.color),
            name = escape_html(&habit.name),
            category = habit.category,
            goal = habit.goal_frequency,
            inactive = if habit.is_active { "" } else { ", paused" },
        );
    }
    body.push_str("</ul></section>");

    let options: String = Category::ALL
        .iter()
        .map(|category| format!(r#"<option value="{category}">{category}</option>"#))
        .collect();
    let _ = write!(
        body,
        r##"<section class="card">
  <h2>New habit</h2>
  <form method="post" action="/habits" class="stack">
    <label>Name <input name="name" required /></label>
    <label>Description <input name="description" /></label>
    <label>Category <select name="category">{options}</select></label>
    <label>Color <input name="color" type="color" value="#10b981" /></label>
    <label>Days per week <input name="goal_frequency" type="number" min="1" max="7" value="7" /></label>
    <button type="submit">Add habit</button>
  </form>
</section>"##
    );

    page("Habits", true, view.message, &body)
}

fn render_day(habit_id: i64, day: &CalendarDay) -> String {
    let (class, label) = match day.state() {
        CellState::Future => ("future", "upcoming"),
        CellState::Completed => ("done", "completed"),
        CellState::NotCompleted => ("missed", "not completed"),
    };
    let title = match &day.notes {
        Some(notes) => format!("{} ({label}): {}", day.date, escape_html(notes)),
        None => format!("{} ({label})", day.date),
    };
    if day.is_future {
        return format!(r#"<span class="day {class}" title="{title}">{}</span>"#, day.date.format("%d"));
    }
    format!(
        r#"<form method="post" action="/habits/{habit_id}/toggle/{date}"><button class="day {class}" title="{title}">{label_day}</button></form>"#,
        date = day.date.format("%Y-%m-%d"),
        label_day = day.date.format("%d"),
    )
}

pub fn render_calendar(view: &CalendarPage<'_>) -> String {
    let habit_id = view.habit.id.unwrap_or_default();
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<header><h1>{}</h1><p class="subtitle">{}</p></header>"#,
        escape_html(&view.habit.name),
        escape_html(view.habit.description.as_deref().unwrap_or("Tap a day to mark it."))
    );

    if let Some(stats) = view.habit_stats {
        let last = stats
            .last_completed
            .map(|date| date.to_string())
            .unwrap_or_else(|| "never".to_string());
        let _ = write!(
            body,
            r#"<section class="panel">
  <div class="stat"><span class="label">Current streak</span><span class="value">{}</span></div>
  <div class="stat"><span class="label">Longest streak</span><span class="value">{}</span></div>
  <div class="stat"><span class="label">Completion</span><span class="value">{:.0}%</span></div>
  <div class="stat"><span class="label">Last done</span><span class="value small">{}</span></div>
</section>"#,
            stats.current_streak, stats.longest_streak, stats.completion_rate, last
        );
    }

    body.push_str(r#"<section class="card"><div class="grid">"#);
    for row in weeks(view.days) {
        body.push_str(r#"<div class="week">"#);
        for day in row {
            body.push_str(&render_day(habit_id, day));
        }
        body.push_str("</div>");
    }
    body.push_str("</div></section>");

    page(&view.habit.name, true, view.message, &body)
}

pub fn render_achievements(view: &AchievementsPage<'_>) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<header><h1>Achievements</h1><p class="subtitle">{}</p></header>"#,
        escape_html(&view.identity.username)
    );
    body.push_str(&render_level_panel(view.stats));

    let unlocked_ids: HashSet<i64> = view
        .unlocked
        .iter()
        .map(|entry| entry.achievement.id)
        .collect();

    body.push_str(r#"<section class="card"><ul class="achievements">"#);
    for achievement in view.catalog {
        let unlocked_at = view
            .unlocked
            .iter()
            .find(|entry| entry.achievement.id == achievement.id)
            .map(|entry| format!("Unlocked {}", escape_html(&entry.unlocked_at)));
        let _ = write!(
            body,
            r#"<li class="{class}"><span class="icon">{icon}</span><div><strong>{name}</strong>
  <p class="subtitle">{description}</p><span class="tag">+{points} pts</span> <span class="subtitle">{status}</span></div></li>"#,
            class = if unlocked_ids.contains(&achievement.id) { "unlocked" } else { "locked" },
            icon = achievement_icon(&achievement.icon),
            name = escape_html(&achievement.name),
            description = escape_html(&achievement.description),
            points = achievement.points_reward,
            status = unlocked_at.unwrap_or_else(|| "Locked".to_string()),
        );
    }
    body.push_str("</ul>");
    body.push_str(
        r#"<form method="post" action="/achievements/check"><button type="submit">Check for new achievements</button></form></section>"#,
    );

    page("Achievements", true, view.message, &body)
}

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Habits</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #10b981;
      --accent-2: #2f4858;
      --miss: #ece6dc;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      padding: 24px 18px 48px;
    }

    nav {
      width: min(860px, 100%);
      display: flex;
      gap: 18px;
      align-items: center;
      margin-bottom: 18px;
    }

    nav a {
      color: var(--accent-2);
      font-weight: 600;
      text-decoration: none;
    }

    nav form {
      margin-left: auto;
    }

    main {
      width: min(860px, 100%);
      display: grid;
      gap: 22px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(1.8rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
    }

    .card {
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
    }

    .card.narrow {
      max-width: 420px;
      justify-self: center;
      width: 100%;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 14px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 6px;
    }

    .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .value {
      display: block;
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .value.small {
      font-size: 1rem;
    }

    .bar {
      height: 12px;
      border-radius: 999px;
      background: var(--miss);
      overflow: hidden;
      margin: 12px 0;
    }

    .bar span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .stack {
      display: grid;
      gap: 12px;
    }

    label {
      display: grid;
      gap: 4px;
      font-weight: 500;
    }

    input, select {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    button {
      font: inherit;
      border: none;
      border-radius: 14px;
      padding: 12px 16px;
      background: var(--accent-2);
      color: white;
      cursor: pointer;
    }

    button.link {
      background: none;
      color: var(--accent-2);
      padding: 0;
      text-decoration: underline;
    }

    .message {
      width: min(860px, 100%);
      margin: 0 0 12px;
      padding: 12px 16px;
      border-radius: 14px;
      background: #fff4e5;
      border: 1px solid #f5d3a7;
    }

    ul.habits, ul.achievements {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      gap: 10px;
    }

    ul.habits li {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: center;
      background: white;
      border-radius: 14px;
      padding: 12px 16px;
      border-left: 6px solid var(--accent);
    }

    ul.habits li form {
      margin-left: auto;
    }

    ul.achievements li {
      display: flex;
      gap: 14px;
      background: white;
      border-radius: 14px;
      padding: 12px 16px;
    }

    ul.achievements li.locked {
      opacity: 0.55;
    }

    .icon {
      font-size: 1.8rem;
    }

    .tag {
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      background: var(--miss);
      border-radius: 999px;
      padding: 3px 10px;
    }

    .grid {
      display: grid;
      gap: 6px;
    }

    .week {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .week form {
      margin: 0;
    }

    .day {
      display: block;
      width: 100%;
      padding: 10px 0;
      border-radius: 10px;
      text-align: center;
      font-size: 0.85rem;
    }

    .day.done {
      background: var(--accent);
      color: white;
    }

    .day.missed {
      background: var(--miss);
      color: var(--ink);
    }

    .day.future {
      background: transparent;
      color: #b7b0a6;
      border: 1px dashed #d8d0c4;
    }
  </style>
</head>
<body>
  {{NAV}}
  {{MESSAGE}}
  <main>
{{BODY}}
  </main>
</body>
</html>
"#;
