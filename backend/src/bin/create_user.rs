//! Operator tool: mints a new user and prints their login key once.
//!
//! There is no self-service signup; accounts are created here and the key
//! is handed to the user out-of-band. Only the argon2 hash is stored, so a
//! lost key means a new account.

use keygate_backend::config::Config;
use keygate_backend::db::connection::create_pool;
use keygate_backend::models::user::User;
use keygate_backend::repositories::{PgUserStore, UserStore};
use keygate_backend::utils::hashing::hash_login_key;
use keygate_backend::utils::keygen::generate_login_key;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    let login_key = generate_login_key();
    let hash = hash_login_key(&login_key)?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user = User::new(hash);
    PgUserStore::new(pool).insert(&user).await?;

    println!("User created.");
    println!("  id:        {}", user.id);
    println!("  login key: {}", login_key);
    println!();
    println!("Save this key now. It is stored only as a hash and cannot be recovered.");

    Ok(())
}
