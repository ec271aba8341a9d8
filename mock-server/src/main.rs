use tokio::net::TcpListener;

use mock_server::Credentials;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let credentials = Credentials {
        username: std::env::var("SMS_USER").unwrap_or_else(|_| "u".to_string()),
        password: std::env::var("SMS_PASS").unwrap_or_else(|_| "p".to_string()),
    };
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_server::run(listener, credentials).await
}
