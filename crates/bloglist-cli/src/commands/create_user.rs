use bloglist_auth::{UserService, UserServiceError};
use bloglist_core::DatabaseConfig;
use clap::Args;
use colored::Colorize;
use rand::Rng;
use tracing::debug;

const GENERATED_PASSWORD_LENGTH: usize = 16;

#[derive(Args)]
pub struct CreateUserCommand {
    /// Database connection URL
    #[arg(long, env = "BLOGLIST_DATABASE_URL")]
    pub database_url: String,

    /// Login name, at least 3 characters
    #[arg(long)]
    pub username: String,

    /// Display name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Password; a random one is generated and printed when omitted
    #[arg(long, env = "BLOGLIST_USER_PASSWORD")]
    pub password: Option<String>,
}

fn generate_password() -> String {
    const CHARSET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";
    let mut rng = rand::thread_rng();
    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

impl CreateUserCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run())
    }

    async fn run(self) -> anyhow::Result<()> {
        let config = DatabaseConfig::new(self.database_url.clone()).with_pool_size(1, 1);
        let db = bloglist_database::establish_connection(&config).await?;
        debug!("Connected to database for user creation");

        let (password, generated) = match self.password {
            Some(password) => (password, false),
            None => (generate_password(), true),
        };

        let user_service = UserService::new(db);
        let user = match user_service
            .create_user(&self.username, &self.name, &password)
            .await
        {
            Ok(user) => user,
            Err(UserServiceError::UsernameTaken(_)) => {
                eprintln!(
                    "{} username '{}' is already taken",
                    "Error:".bright_red().bold(),
                    self.username
                );
                return Err(anyhow::anyhow!("username already taken"));
            }
            Err(e) => return Err(e.into()),
        };

        println!();
        println!("{}", "✅ User created".bright_green().bold());
        println!("{} {}", "Id:".bright_white().bold(), user.id);
        println!(
            "{} {}",
            "Username:".bright_white().bold(),
            user.username.bright_cyan()
        );
        if generated {
            println!(
                "{} {}",
                "Password:".bright_white().bold(),
                password.bright_yellow().bold()
            );
            println!(
                "{}",
                "Save this password now, it will not be shown again.".bright_yellow()
            );
        }
        println!();

        Ok(())
    }
}
