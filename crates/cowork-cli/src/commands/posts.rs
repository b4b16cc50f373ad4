use crate::cli::PostsArgs;
use crate::output::OutputWriter;
use crate::output_types::PostRow;
use anyhow::Result;
use cowork_client::DirectoryApi;

pub async fn execute(args: PostsArgs, api: &dyn DirectoryApi, output: &OutputWriter) -> Result<()> {
    let Some(slug) = args.slug else {
        let posts = api.list_posts().await?;
        if output.is_json() {
            return output.result(posts);
        }
        output.table(posts.iter().map(PostRow::from).collect());
        return Ok(());
    };

    let post = api.get_post(&slug).await?;
    if output.is_json() {
        return output.result(post);
    }

    output.section(&post.title);
    output.kv("By", &post.author);
    output.kv("Published", post.published_at.format("%Y-%m-%d"));
    if !post.tags.is_empty() {
        output.kv("Tags", post.tags.join(", "));
    }
    println!("\n{}", post.content);
    Ok(())
}
