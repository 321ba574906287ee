use chrono::{Datelike, Utc};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use gitwrapped::models::WrappedSummary;
use gitwrapped::{source, Config, GitHubClient, PipelineConfig, WrappedPipeline};

#[derive(Parser, Debug)]
#[command(name = "gitwrapped")]
#[command(version)]
#[command(about = "A year-in-review of a GitHub user's activity")]
struct Args {
    /// GitHub username
    username: String,

    /// Calendar year to summarise (defaults to the current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Output format (json, text, markdown)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// GitHub token; overrides GITHUB_TOKEN
    #[arg(long)]
    token: Option<String>,

    /// Cap on repositories requested per listing (1-100)
    #[arg(long)]
    max_repositories: Option<u32>,

    /// Skip per-repository language lookups on the REST path
    #[arg(long)]
    no_repo_languages: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gitwrapped=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(token) = args.token.clone() {
        config.github_token = Some(token);
    }
    if let Some(max) = args.max_repositories {
        anyhow::ensure!((1..=100).contains(&max), "--max-repositories must be between 1 and 100");
        config.max_repositories = max;
    }
    if args.no_repo_languages {
        config.fetch_repo_languages = false;
    }
    tracing::debug!("GitHub token supplied: {}", config.github_token.is_some());

    let github = GitHubClient::new(config.github_token.as_deref())?
        .with_base_url(&config.api_base_url);
    let pipeline_config = PipelineConfig::from(&config);
    let pipeline = WrappedPipeline::from_shared(source::from_client(Arc::new(github), &pipeline_config)?);

    let year = args.year.unwrap_or_else(|| Utc::now().year());
    let summary = match pipeline.generate(&args.username, year).await {
        Ok(summary) => summary,
        Err(e) => {
            if e.is_retryable() {
                tracing::warn!("Request failed transiently, try again shortly");
            }
            return Err(e.into());
        }
    };

    output_summary(&summary, &args)?;

    Ok(())
}

fn output_summary(summary: &WrappedSummary, args: &Args) -> anyhow::Result<()> {
    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(summary)?,
        "markdown" => format_markdown(summary),
        _ => format_text(summary),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn display_name(summary: &WrappedSummary) -> &str {
    summary.user.name.as_deref().unwrap_or(&summary.user.username)
}

fn format_text(summary: &WrappedSummary) -> String {
    let stats = &summary.stats;
    let highlights = &summary.highlights;
    let mut output = String::new();

    output.push_str(&format!(
        "\n=== {} Wrapped: {} (@{}) ===\n\n",
        summary.year,
        display_name(summary),
        summary.user.username
    ));
    if let Some(ref bio) = summary.user.bio {
        output.push_str(&format!("{}\n", bio));
    }
    output.push_str(&format!("On GitHub since {}\n\n", summary.user.member_since));

    let primary = &summary.personality.primary;
    output.push_str(&format!(
        "Personality: {} {} - {}\n",
        primary.emoji, primary.label, primary.description
    ));
    for badge in &summary.personality.badges {
        output.push_str(&format!("  + {} {}\n", badge.emoji, badge.label));
    }

    output.push_str(&format!(
        "\nContributions: {} ({} public, {} private)\n",
        stats.total_commits, stats.public_commits, stats.private_commits
    ));
    output.push_str(&format!(
        "Pull requests: {}  Issues: {}  Reviews: {}\n",
        stats.total_prs, stats.total_issues, stats.total_reviews
    ));
    output.push_str(&format!(
        "Active days: {}  Idle days: {}\n",
        stats.active_days, stats.idle_days
    ));
    output.push_str(&format!(
        "Longest streak: {} days  Current streak: {} days\n",
        stats.longest_streak, stats.current_streak
    ));

    output.push_str("\nHighlights:\n");
    output.push_str(&format!(
        "  Best month: {} ({} contributions)\n",
        highlights.most_productive_month.month, highlights.most_productive_month.commits
    ));
    output.push_str(&format!("  Best day: {}\n", highlights.most_productive_day));
    output.push_str(&format!(
        "  Per active day: {:.1}\n",
        highlights.average_commits_per_active_day
    ));
    let by_day: Vec<String> = highlights
        .commits_by_day_of_week
        .iter()
        .map(|(day, count)| format!("{} {}", &day[..3], count))
        .collect();
    output.push_str(&format!("  By weekday: {}\n", by_day.join(", ")));

    if !summary.repositories.top.is_empty() {
        output.push_str(&format!(
            "\nTop Repositories ({} contributed):\n",
            summary.repositories.total_contributed
        ));
        for repo in &summary.repositories.top {
            output.push_str(&format!(
                "  - {}: {} commits, {} stars{}\n",
                repo.full_name,
                repo.commits,
                repo.stars,
                repo.language
                    .as_ref()
                    .map(|l| format!(" [{}]", l))
                    .unwrap_or_default()
            ));
        }
    }

    if !summary.languages.top.is_empty() {
        output.push_str(&format!("\nLanguages ({} total):\n", summary.languages.total));
        for lang in &summary.languages.top {
            output.push_str(&format!("  - {}: {}%\n", lang.name, lang.percentage));
        }
    }

    output.push_str(&format!(
        "\nRepositories owned: {} ({} public, {} private)\n",
        stats.total_repos_owned, stats.public_repos_owned, stats.private_repos_owned
    ));
    output.push_str(&format!(
        "Stars: {} (avg {:.1} per repo)\n",
        stats.total_stars, stats.average_stars_per_repo
    ));
    if let Some(ref repo) = stats.most_starred_repo {
        output.push_str(&format!(
            "Most starred: {}/{} ({} stars)\n",
            repo.owner, repo.name, repo.stars
        ));
    }
    output.push_str(&format!(
        "Followers: {}  Following: {}\n",
        stats.followers, stats.following
    ));

    output.push_str(&format!(
        "Reviews per PR: {:.1}{}\n",
        summary.review_stats.reviews_per_pr,
        summary
            .review_stats
            .most_reviewed_repo
            .as_ref()
            .map(|r| format!(" (busiest: {})", r))
            .unwrap_or_default()
    ));

    output.push_str(&format!(
        "\nGenerated on: {}\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}

fn format_markdown(summary: &WrappedSummary) -> String {
    let stats = &summary.stats;
    let highlights = &summary.highlights;
    let mut output = String::new();

    output.push_str(&format!(
        "# {} Wrapped: {}\n\n",
        summary.year,
        display_name(summary)
    ));
    if let Some(ref bio) = summary.user.bio {
        output.push_str(&format!("> {}\n\n", bio));
    }

    let primary = &summary.personality.primary;
    output.push_str(&format!(
        "## {} {}\n\n{}\n\n",
        primary.emoji, primary.label, primary.description
    ));
    if !summary.personality.badges.is_empty() {
        let badges: Vec<String> = summary
            .personality
            .badges
            .iter()
            .map(|b| format!("{} {}", b.emoji, b.label))
            .collect();
        output.push_str(&format!("**Badges:** {}\n\n", badges.join(" · ")));
    }

    output.push_str("## Overview\n\n");
    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Contributions | {} |\n", stats.total_commits));
    output.push_str(&format!("| Public / Private | {} / {} |\n", stats.public_commits, stats.private_commits));
    output.push_str(&format!("| Pull Requests | {} |\n", stats.total_prs));
    output.push_str(&format!("| Issues | {} |\n", stats.total_issues));
    output.push_str(&format!("| Reviews | {} |\n", stats.total_reviews));
    output.push_str(&format!("| Active Days | {} |\n", stats.active_days));
    output.push_str(&format!("| Longest Streak | {} days |\n", stats.longest_streak));
    output.push_str(&format!("| Current Streak | {} days |\n", stats.current_streak));
    output.push_str(&format!("| Stars | {} |\n", stats.total_stars));
    output.push_str(&format!("| Followers | {} |\n", stats.followers));

    output.push_str("\n## Highlights\n\n");
    output.push_str(&format!(
        "- Most productive month: **{}** ({} contributions)\n",
        highlights.most_productive_month.month, highlights.most_productive_month.commits
    ));
    output.push_str(&format!(
        "- Most productive day: **{}**\n",
        highlights.most_productive_day
    ));
    output.push_str(&format!(
        "- Average per active day: {:.1}\n",
        highlights.average_commits_per_active_day
    ));
    output.push_str(&format!(
        "- Reviews per PR: {:.1}\n",
        summary.review_stats.reviews_per_pr
    ));

    if !summary.repositories.top.is_empty() {
        output.push_str("\n## Top Repositories\n\n");
        output.push_str("| Repository | Commits | Language | Stars |\n");
        output.push_str("|------------|---------|----------|-------|\n");
        for repo in &summary.repositories.top {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                repo.full_name,
                repo.commits,
                repo.language.as_deref().unwrap_or("-"),
                repo.stars
            ));
        }
    }

    if !summary.languages.top.is_empty() {
        output.push_str("\n## Languages\n\n");
        output.push_str("| Language | Share |\n|----------|-------|\n");
        for lang in &summary.languages.top {
            output.push_str(&format!("| {} | {}% |\n", lang.name, lang.percentage));
        }
    }

    output.push_str(&format!(
        "\n---\n*Generated on {}*\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}
