#[tokio::main]
async fn main() {
    macrorify_lsp::run().await;
}
