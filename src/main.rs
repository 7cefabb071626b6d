#[tokio::main]
async fn main() {
    quotewall::start_server().await;
}
