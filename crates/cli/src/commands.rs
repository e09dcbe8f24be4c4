//! CLI commands

use anyhow::{Result, bail};
use blackhole_core::types::{Pagination, StatsTotals};
use blackhole_core::validation::{LoginForm, RegistrationForm, VerificationForm, validators};
use blackhole_core::{Manga, MangaStatus, SessionStorage, SortBy, User, UserId, Validate};
use blackhole_http::types::{
    ChapterUpdate, MangaListQuery, MangaUpdate, NewChapter, NewManga, PageQuery, ProfileUpdate,
    ReviewRequest,
};
use blackhole_http::{BlackHoleClient, BlackHoleClientBuilder, GatewayEvent};
use blackhole_session::{Outcome, SessionStore};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info};

use crate::config::{self, CliConfig};

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and keep the session for later commands
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "BLACKHOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Create an account; a verification code is sent by email
    Register {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long, env = "BLACKHOLE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Repeat the password (defaults to --password)
        #[arg(long)]
        confirm_password: Option<String>,

        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,
    },

    /// Activate an account with the emailed code
    Verify {
        #[arg(long)]
        user_id: UserId,

        #[arg(long)]
        code: String,
    },

    /// Request a new verification code
    ResendVerification {
        #[arg(long)]
        email: String,
    },

    /// Show the signed-in user after revalidating the stored session
    Whoami,

    /// Profile management
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Browse and interact with the catalog
    Manga {
        #[command(subcommand)]
        command: MangaCommands,
    },

    /// Administration (admin or moderator rights required)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Public user directory
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },

    /// Configuration files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Change username, bio or avatar
    Update {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum MangaCommands {
    /// List series, optionally filtered
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Match against English and Arabic titles
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        genre: Option<String>,

        #[arg(long)]
        status: Option<MangaStatus>,

        /// updated_at, rating or title
        #[arg(long)]
        sort_by: Option<SortBy>,
    },

    /// Series details and chapters
    Show { manga_id: i64 },

    /// Chapter pages and comments
    Chapter { manga_id: i64, chapter_id: i64 },

    /// Rate a series from 1 to 5
    Rate { manga_id: i64, rating: f64 },

    /// Rate a chapter from 1 to 5
    RateChapter {
        manga_id: i64,
        chapter_id: i64,
        rating: f64,
    },

    /// Write or replace your review of a series
    Review {
        manga_id: i64,

        #[arg(long)]
        rating: f64,

        #[arg(long)]
        content: String,
    },

    /// Comment on a chapter
    Comment {
        manga_id: i64,
        chapter_id: i64,

        #[arg(long)]
        content: String,
    },

    /// Add or remove a series from favorites
    Favorite { manga_id: i64 },

    /// List your favorites
    Favorites {
        #[command(flatten)]
        page: PageArgs,
    },

    /// List your reading progress
    Progress {
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Submit the admin panel password
    Login {
        #[arg(long, env = "BLACKHOLE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Site totals and recent activity
    Stats,

    /// Add a series
    CreateManga {
        #[arg(long)]
        title: String,

        #[arg(long)]
        arabic_title: String,

        #[command(flatten)]
        fields: MangaFields,
    },

    /// Edit a series
    UpdateManga {
        manga_id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        arabic_title: Option<String>,

        #[command(flatten)]
        fields: MangaFields,
    },

    /// Remove a series and everything attached to it
    DeleteManga { manga_id: i64 },

    /// Add a chapter to a series
    CreateChapter {
        manga_id: i64,

        #[arg(long)]
        number: f64,

        #[arg(long)]
        title: Option<String>,

        /// Page image URL, repeat in reading order
        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Edit a chapter
    UpdateChapter {
        chapter_id: i64,

        #[arg(long)]
        number: Option<f64>,

        #[arg(long)]
        title: Option<String>,

        /// Replacement page image URLs, repeat in reading order
        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Remove a chapter
    DeleteChapter { chapter_id: i64 },

    /// List all comments
    Comments {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Pin or unpin a comment
    PinComment { comment_id: i64 },

    /// Remove a comment
    DeleteComment { comment_id: i64 },

    /// List all accounts
    Users {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Ban or unban a user
    Ban { user_id: UserId },

    /// Grant or revoke moderator rights
    Promote { user_id: UserId },
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List public profiles
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one public profile
    Show { user_id: UserId },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a configuration file with default values
    Init {
        /// Output file path (defaults to the platform config directory)
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    per_page: Option<u32>,
}

impl From<PageArgs> for PageQuery {
    fn from(args: PageArgs) -> Self {
        Self {
            page: args.page,
            per_page: args.per_page,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct MangaFields {
    #[arg(long)]
    description: Option<String>,

    /// Comma-separated genres
    #[arg(long)]
    genre: Option<String>,

    #[arg(long)]
    status: Option<MangaStatus>,

    #[arg(long)]
    author: Option<String>,

    #[arg(long)]
    artist: Option<String>,

    #[arg(long)]
    cover_image: Option<String>,
}

/// Per-invocation state: the store, its gateway and how to print results
struct Context {
    store: SessionStore,
    events: broadcast::Receiver<GatewayEvent>,
    config: CliConfig,
    json: bool,
}

impl Context {
    fn connect(config: CliConfig, json: bool) -> Result<Self> {
        config.client.validate()?;

        let storage = SessionStorage::file(config.session_path());
        let client = BlackHoleClientBuilder::from_config(&config.client)
            .storage(storage)
            .build()?;
        let events = client.subscribe();
        debug!(base_url = client.base_url(), "Connected client");

        Ok(Self {
            store: SessionStore::new(client),
            events,
            config,
            json,
        })
    }

    fn client(&self) -> &BlackHoleClient {
        self.store.client()
    }

    /// Print `value` as JSON when requested, otherwise the human rendering
    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", human());
        }
        Ok(())
    }

    /// Tell the user when a request during this command ended their session
    fn report_expiry(&mut self) {
        match self.events.try_recv() {
            Ok(GatewayEvent::SessionExpired) | Err(TryRecvError::Lagged(_)) => {
                eprintln!("Your session has expired. Log in again with `blackhole login`.");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => {}
        }
    }

    async fn require_session(&self) -> Result<User> {
        match self.store.initialize().await.user {
            Some(user) => Ok(user),
            None => bail!("Not signed in. Run `blackhole login` first."),
        }
    }
}

/// Print an outcome's message and turn failures into errors
fn report<T>(outcome: Outcome<T>) -> Result<T> {
    match outcome {
        Outcome::Success { value, message } => {
            eprintln!("{message}");
            Ok(value)
        }
        Outcome::Failure { message } => bail!(message),
    }
}

/// Print the server's message, or `fallback` when it sent none
fn notify(message: Option<&str>, fallback: &str) {
    eprintln!("{}", message.unwrap_or(fallback));
}

impl Commands {
    pub async fn execute(self, config: CliConfig, json: bool) -> Result<()> {
        let command = match self {
            Commands::Config { command } => return command.execute(&config, json),
            command => command,
        };

        let mut ctx = Context::connect(config, json)?;
        if command.revalidates_session() {
            let session = ctx.store.initialize().await;
            debug!(authenticated = session.is_authenticated(), "Session revalidated");
        }
        let result = command.run(&ctx).await;
        ctx.report_expiry();
        ctx.store.dispose();
        result
    }

    /// Whether the stored session is revalidated before the command runs.
    /// Logout only forgets it and config commands never touch the network.
    fn revalidates_session(&self) -> bool {
        !matches!(self, Commands::Logout | Commands::Config { .. })
    }

    async fn run(self, ctx: &Context) -> Result<()> {
        match self {
            Commands::Login { email, password } => login(ctx, email, password).await,
            Commands::Logout => {
                report(ctx.store.logout())?;
                Ok(())
            }
            Commands::Register {
                username,
                email,
                password,
                confirm_password,
                accept_terms,
            } => {
                let form = RegistrationForm {
                    confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                    username,
                    email,
                    password,
                    accept_terms,
                };
                register(ctx, form).await
            }
            Commands::Verify { user_id, code } => {
                let form = VerificationForm {
                    user_id,
                    verification_code: code.trim().to_string(),
                };
                form.validate()?;
                report(ctx.store.verify(form.user_id, &form.verification_code).await)?;
                Ok(())
            }
            Commands::ResendVerification { email } => {
                validators::validate_email(&email)?;
                report(ctx.store.resend_verification(&email).await)?;
                Ok(())
            }
            Commands::Whoami => {
                let user = ctx.require_session().await?;
                ctx.emit(&user, || describe_user(&user))
            }
            Commands::Profile { command } => command.run(ctx).await,
            Commands::Manga { command } => command.run(ctx).await,
            Commands::Admin { command } => command.run(ctx).await,
            Commands::Users { command } => command.run(ctx).await,
            Commands::Config { command } => command.execute(&ctx.config, ctx.json),
        }
    }
}

async fn login(ctx: &Context, email: String, password: String) -> Result<()> {
    let form = LoginForm { email, password };
    form.validate()?;

    let user = report(ctx.store.login(form.email.trim(), &form.password).await)?;
    info!(user_id = user.id, "Session stored at {}", ctx.config.session_path().display());
    ctx.emit(&user, || describe_user(&user))
}

async fn register(ctx: &Context, form: RegistrationForm) -> Result<()> {
    form.validate()?;

    let user_id = report(
        ctx.store
            .register(&form.username, form.email.trim(), &form.password)
            .await,
    )?;
    ctx.emit(&serde_json::json!({ "user_id": user_id }), || {
        format!(
            "Account {user_id} created. Activate it with `blackhole verify --user-id {user_id} --code <code>`."
        )
    })
}

impl ProfileCommands {
    async fn run(self, ctx: &Context) -> Result<()> {
        match self {
            ProfileCommands::Update {
                username,
                bio,
                avatar,
            } => {
                if username.is_none() && bio.is_none() && avatar.is_none() {
                    bail!("Nothing to update. Pass --username, --bio or --avatar.");
                }
                if let Some(username) = &username {
                    validators::validate_username(username)?;
                }

                ctx.require_session().await?;
                let update = ProfileUpdate {
                    username,
                    bio,
                    profile_image: avatar,
                };
                let user = report(ctx.store.update_profile(&update).await)?;
                ctx.emit(&user, || describe_user(&user))
            }
        }
    }
}

impl MangaCommands {
    async fn run(self, ctx: &Context) -> Result<()> {
        let client = ctx.client();
        match self {
            MangaCommands::List {
                page,
                search,
                genre,
                status,
                sort_by,
            } => {
                let query = MangaListQuery {
                    page: page.page,
                    per_page: page.per_page,
                    search,
                    genre,
                    status,
                    sort_by,
                };
                let response = client.list_manga(&query).await?;
                ctx.emit(&response, || {
                    let mut lines: Vec<String> = response.manga.iter().map(describe_manga).collect();
                    lines.push(describe_pagination(&response.pagination));
                    lines.join("\n")
                })
            }
            MangaCommands::Show { manga_id } => {
                let details = client.get_manga(manga_id).await?.manga;
                ctx.emit(&details, || {
                    let manga = &details.manga;
                    let mut lines = vec![
                        describe_manga(manga),
                        format!("  {}", manga.arabic_title),
                        format!("  Genres: {}", manga.genres().join(", ")),
                    ];
                    if let Some(description) = &manga.description {
                        lines.push(format!("  {description}"));
                    }
                    if details.is_favorite {
                        lines.push("  In your favorites".to_string());
                    }
                    if let Some(last_read) = details.reading_progress {
                        lines.push(format!("  Last chapter read: {last_read}"));
                    }
                    for chapter in &details.chapters {
                        lines.push(format!(
                            "  #{:<6} {:>6}  {}",
                            chapter.id,
                            chapter.chapter_number,
                            chapter.title.as_deref().unwrap_or("")
                        ));
                    }
                    lines.join("\n")
                })
            }
            MangaCommands::Chapter {
                manga_id,
                chapter_id,
            } => {
                let details = client.get_chapter(manga_id, chapter_id).await?.chapter;
                ctx.emit(&details, || {
                    let mut lines: Vec<String> = details.chapter.image_urls();
                    for comment in &details.comments {
                        let author = comment
                            .user
                            .as_ref()
                            .map(|user| user.username.as_str())
                            .unwrap_or("?");
                        let pin = if comment.is_pinned { " (pinned)" } else { "" };
                        lines.push(format!("[{author}{pin}] {}", comment.content));
                    }
                    lines.join("\n")
                })
            }
            MangaCommands::Rate { manga_id, rating } => {
                validators::validate_rating(rating)?;
                let response = client.rate_manga(manga_id, rating).await?;
                notify(response.message.as_deref(), "Rating saved");
                Ok(())
            }
            MangaCommands::RateChapter {
                manga_id,
                chapter_id,
                rating,
            } => {
                validators::validate_rating(rating)?;
                let response = client.rate_chapter(manga_id, chapter_id, rating).await?;
                notify(response.message.as_deref(), "Rating saved");
                Ok(())
            }
            MangaCommands::Review {
                manga_id,
                rating,
                content,
            } => {
                validators::validate_rating(rating)?;
                validators::validate_content(&content)?;
                let response = client
                    .add_review(manga_id, &ReviewRequest { content, rating })
                    .await?;
                notify(response.message.as_deref(), "Review saved");
                Ok(())
            }
            MangaCommands::Comment {
                manga_id,
                chapter_id,
                content,
            } => {
                validators::validate_content(&content)?;
                let response = client.add_comment(manga_id, chapter_id, content).await?;
                notify(response.message.as_deref(), "Comment added");
                Ok(())
            }
            MangaCommands::Favorite { manga_id } => {
                let response = client.toggle_favorite(manga_id).await?;
                let fallback = if response.is_favorite {
                    "Added to favorites"
                } else {
                    "Removed from favorites"
                };
                notify(response.message.as_deref(), fallback);
                Ok(())
            }
            MangaCommands::Favorites { page } => {
                let response = client.favorites(&page.into()).await?;
                ctx.emit(&response, || {
                    let mut lines: Vec<String> = response
                        .favorites
                        .iter()
                        .map(|favorite| match &favorite.manga {
                            Some(manga) => describe_manga(manga),
                            None => format!("#{:<6} (series {})", favorite.id, favorite.manga_id),
                        })
                        .collect();
                    lines.push(describe_pagination(&response.pagination));
                    lines.join("\n")
                })
            }
            MangaCommands::Progress { page } => {
                let response = client.reading_progress(&page.into()).await?;
                ctx.emit(&response, || {
                    let mut lines: Vec<String> = response
                        .reading_progress
                        .iter()
                        .map(|progress| {
                            let title = progress
                                .manga
                                .as_ref()
                                .map(|manga| manga.title.clone())
                                .unwrap_or_else(|| format!("series {}", progress.manga_id));
                            format!("{title}: chapter {}", progress.last_chapter_read)
                        })
                        .collect();
                    lines.push(describe_pagination(&response.pagination));
                    lines.join("\n")
                })
            }
        }
    }
}

impl AdminCommands {
    async fn run(self, ctx: &Context) -> Result<()> {
        let client = ctx.client();
        match self {
            AdminCommands::Login { password } => {
                validators::validate_required(&password, "password", "كلمة المرور مطلوبة")?;
                let response = client.admin_login(password).await?;
                notify(response.message.as_deref(), "Admin access granted");
                Ok(())
            }
            AdminCommands::Stats => {
                let stats = client.admin_stats().await?.stats;
                ctx.emit(&stats, || describe_totals(&stats.totals))
            }
            AdminCommands::CreateManga {
                title,
                arabic_title,
                fields,
            } => {
                let manga = NewManga {
                    title,
                    arabic_title,
                    description: fields.description,
                    genre: fields.genre,
                    status: fields.status,
                    author: fields.author,
                    artist: fields.artist,
                    cover_image: fields.cover_image,
                };
                let response = client.create_manga(&manga).await?;
                notify(response.message.as_deref(), "Series created");
                ctx.emit(&response.manga, || describe_manga(&response.manga))
            }
            AdminCommands::UpdateManga {
                manga_id,
                title,
                arabic_title,
                fields,
            } => {
                let update = MangaUpdate {
                    title,
                    arabic_title,
                    description: fields.description,
                    genre: fields.genre,
                    status: fields.status,
                    author: fields.author,
                    artist: fields.artist,
                    cover_image: fields.cover_image,
                };
                let response = client.update_manga(manga_id, &update).await?;
                notify(response.message.as_deref(), "Series updated");
                ctx.emit(&response.manga, || describe_manga(&response.manga))
            }
            AdminCommands::DeleteManga { manga_id } => {
                let response = client.delete_manga(manga_id).await?;
                notify(response.message.as_deref(), "Series deleted");
                Ok(())
            }
            AdminCommands::CreateChapter {
                manga_id,
                number,
                title,
                images,
            } => {
                let chapter = NewChapter {
                    chapter_number: number,
                    title,
                    images,
                };
                let response = client.create_chapter(manga_id, &chapter).await?;
                notify(response.message.as_deref(), "Chapter created");
                ctx.emit(&response.chapter, || {
                    format!(
                        "#{} chapter {} of series {}",
                        response.chapter.id,
                        response.chapter.chapter_number,
                        response.chapter.manga_id
                    )
                })
            }
            AdminCommands::UpdateChapter {
                chapter_id,
                number,
                title,
                images,
            } => {
                let update = ChapterUpdate {
                    chapter_number: number,
                    title,
                    images: (!images.is_empty()).then_some(images),
                };
                let response = client.update_chapter(chapter_id, &update).await?;
                notify(response.message.as_deref(), "Chapter updated");
                Ok(())
            }
            AdminCommands::DeleteChapter { chapter_id } => {
                let response = client.delete_chapter(chapter_id).await?;
                notify(response.message.as_deref(), "Chapter deleted");
                Ok(())
            }
            AdminCommands::Comments { page } => {
                let response = client.admin_comments(&page.into()).await?;
                ctx.emit(&response, || {
                    let mut lines: Vec<String> = response
                        .comments
                        .iter()
                        .map(|comment| {
                            let pin = if comment.is_pinned { "*" } else { " " };
                            format!("#{:<6}{pin} user {}: {}", comment.id, comment.user_id, comment.content)
                        })
                        .collect();
                    lines.push(describe_pagination(&response.pagination));
                    lines.join("\n")
                })
            }
            AdminCommands::PinComment { comment_id } => {
                let response = client.pin_comment(comment_id).await?;
                notify(response.message.as_deref(), "Comment pin toggled");
                Ok(())
            }
            AdminCommands::DeleteComment { comment_id } => {
                let response = client.delete_comment(comment_id).await?;
                notify(response.message.as_deref(), "Comment deleted");
                Ok(())
            }
            AdminCommands::Users { page } => {
                let response = client.admin_users(&page.into()).await?;
                ctx.emit(&response, || {
                    let mut lines: Vec<String> = response.users.iter().map(describe_user).collect();
                    lines.push(describe_pagination(&response.pagination));
                    lines.join("\n")
                })
            }
            AdminCommands::Ban { user_id } => {
                let response = client.ban_user(user_id).await?;
                notify(response.message.as_deref(), "Ban toggled");
                ctx.emit(&response.user, || describe_user(&response.user))
            }
            AdminCommands::Promote { user_id } => {
                let response = client.promote_user(user_id).await?;
                notify(response.message.as_deref(), "Moderator rights toggled");
                ctx.emit(&response.user, || describe_user(&response.user))
            }
        }
    }
}

impl UsersCommands {
    async fn run(self, ctx: &Context) -> Result<()> {
        match self {
            UsersCommands::List { page } => {
                let directory = ctx.client().list_users(&page.into()).await?;
                ctx.emit(&directory, || {
                    let mut lines: Vec<String> =
                        directory.users().iter().map(describe_user).collect();
                    if let Some(pagination) = directory.pagination() {
                        lines.push(describe_pagination(pagination));
                    }
                    lines.join("\n")
                })
            }
            UsersCommands::Show { user_id } => {
                let user = ctx.client().get_user(user_id).await?.into_user();
                ctx.emit(&user, || describe_user(&user))
            }
        }
    }
}

impl ConfigCommands {
    fn execute(self, config: &CliConfig, json: bool) -> Result<()> {
        match self {
            ConfigCommands::Init { output, force } => {
                let config_path = output.unwrap_or_else(config::default_config_path);
                if config_path.exists() && !force {
                    bail!(
                        "{} already exists; pass --force to overwrite",
                        config_path.display()
                    );
                }

                config::generate_default_config(&config_path)?;
                println!("Generated configuration at: {}", config_path.display());
                Ok(())
            }
            ConfigCommands::Show => {
                if json {
                    println!("{}", serde_json::to_string_pretty(config)?);
                } else {
                    print!("{}", toml::to_string_pretty(config)?);
                }
                Ok(())
            }
        }
    }
}

fn describe_user(user: &User) -> String {
    let mut roles = Vec::new();
    if user.is_admin {
        roles.push("admin");
    }
    if user.is_moderator {
        roles.push("moderator");
    }
    if !user.is_verified {
        roles.push("unverified");
    }
    if user.is_banned {
        roles.push("banned");
    }

    let mut line = format!("#{} {} <{}>", user.id, user.username, user.email);
    if !roles.is_empty() {
        line.push_str(&format!(" [{}]", roles.join(", ")));
    }
    if !user.bio.is_empty() {
        line.push_str(&format!("\n  {}", user.bio));
    }
    line
}

fn describe_manga(manga: &Manga) -> String {
    format!(
        "#{:<6} {} ({}, {} chapters, rated {:.1})",
        manga.id, manga.title, manga.status, manga.total_chapters, manga.average_rating
    )
}

fn describe_pagination(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} ({} total)",
        pagination.page,
        pagination.pages.max(1),
        pagination.total
    )
}

fn describe_totals(totals: &StatsTotals) -> String {
    [
        format!("Users:          {}", totals.users),
        format!("Verified users: {}", totals.verified_users),
        format!("Banned users:   {}", totals.banned_users),
        format!("Series:         {}", totals.manga),
        format!("Chapters:       {}", totals.chapters),
        format!("Comments:       {}", totals.comments),
        format!("Ratings:        {}", totals.ratings),
        format!("Reviews:        {}", totals.reviews),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool, is_verified: bool) -> User {
        User {
            id: 3,
            username: "reader".into(),
            email: "reader@example.com".into(),
            is_admin,
            is_moderator: false,
            is_verified,
            is_banned: false,
            bio: String::new(),
            avatar: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn describe_user_lists_roles() {
        assert_eq!(describe_user(&user(false, true)), "#3 reader <reader@example.com>");
        assert_eq!(
            describe_user(&user(true, false)),
            "#3 reader <reader@example.com> [admin, unverified]"
        );
    }

    #[test]
    fn page_args_map_onto_query() {
        let args = PageArgs {
            page: Some(2),
            per_page: None,
        };
        assert_eq!(
            PageQuery::from(args),
            PageQuery {
                page: Some(2),
                per_page: None
            }
        );
    }

    #[test]
    fn empty_listing_reports_one_page() {
        let pagination = Pagination {
            page: 1,
            per_page: 20,
            total: 0,
            pages: 0,
            has_next: false,
            has_prev: false,
        };
        assert_eq!(describe_pagination(&pagination), "Page 1 of 1 (0 total)");
    }
}
