use crate::{cli::ListArgs, config::Config, content, date::DateFormat, paths::static_paths};

pub async fn list(args: ListArgs) -> anyhow::Result<()> {
    let config = Config::read(&args.config).await?;
    let posts = content::collect(&config.content).await?;
    let paths = static_paths(&posts);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    let date_format = DateFormat::new(&config.card.date_format)?;
    for path in &paths {
        println!(
            "{}\t{}\t{}",
            path.route(&config.output.route),
            date_format.format(path.props.pub_date),
            path.props.title
        );
    }

    Ok(())
}
