use cucumber::World;

#[path = "../src/features/mod.rs"]
mod features;

#[tokio::main]
async fn main() {
    features::PlumsortWorld::cucumber().run_and_exit("features/access/").await;
}
