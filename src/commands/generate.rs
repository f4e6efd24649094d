use crate::{
    cli::GenerateArgs,
    config::Config,
    content,
    date::DateFormat,
    hash::Hash,
    lockfile::{self, Lockfile, LockfileEntry},
    paths::{self, static_paths, StaticPath},
    progress_bar::ProgressBar,
    render::Renderer,
    response::{self, PreviewResponse},
};
use anyhow::{bail, Context};
use fs_err::tokio as fs;
use indicatif::MultiProgress;
use log::{debug, error, info, warn};
use std::{
    collections::BTreeSet,
    fmt::Write,
    path::{Path, PathBuf},
    thread,
};
use tokio::task::JoinSet;

struct Job {
    path: StaticPath,
    hash: Hash,
    output: PathBuf,
}

pub async fn generate(args: GenerateArgs, multi_progress: MultiProgress) -> anyhow::Result<()> {
    let config = Config::read(&args.config).await?;
    let (renderer, date_format) = super::renderer(config.fonts.as_ref(), &config.card).await?;

    let posts = content::collect(&config.content).await?;
    let paths = static_paths(&posts);
    info!(
        "Found {} posts, {} without a custom preview image",
        posts.len(),
        paths.len()
    );

    let lock_path = args.config.with_file_name(lockfile::FILE_NAME);
    let existing = Lockfile::read(&lock_path).await?;
    let mut new_lockfile = Lockfile::default();

    let wanted = paths
        .iter()
        .map(|path| path.params.slug.as_str())
        .collect::<BTreeSet<_>>();
    let stale = existing
        .slugs()
        .filter(|slug| !wanted.contains(slug))
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut pending = Vec::new();
    for path in &paths {
        let slug = path.params.slug.as_str();
        let date = date_format.format(path.props.pub_date);
        let hash = renderer.fingerprint(&path.props.title, &date);
        let output = path.output_path(&config.output.dir);

        let previous = existing.get(slug);
        let unchanged = previous.is_some_and(|entry| entry.hash == hash);

        if !args.force && unchanged && fs::try_exists(&output).await? {
            debug!("{} is up to date", output.display());
            new_lockfile.insert(slug, LockfileEntry { hash });
            continue;
        }

        // Keep the old record until the new image is written, so a failed
        // run can still prune it later.
        if let Some(previous) = previous {
            new_lockfile.insert(slug, previous.clone());
        }

        pending.push(Job {
            path: path.clone(),
            hash,
            output,
        });
    }

    if args.dry_run {
        for job in &pending {
            info!("Image {} would be rendered", job.output.display());
        }
        for slug in &stale {
            info!(
                "Image {} would be removed",
                paths::output_path(&config.output.dir, slug).display()
            );
        }

        if !pending.is_empty() || !stale.is_empty() {
            bail!(
                "{} images would be rendered and {} removed",
                pending.len(),
                stale.len()
            );
        }

        info!("All images are up to date.");
        return Ok(());
    }

    for slug in &stale {
        remove_image(&paths::output_path(&config.output.dir, slug)).await?;
    }

    let up_to_date = paths.len() - pending.len();
    let jobs = args
        .jobs
        .or_else(|| thread::available_parallelism().ok())
        .map_or(1, |jobs| jobs.get());

    let result = render_all(
        pending,
        renderer,
        date_format,
        jobs,
        args.keep_going,
        &multi_progress,
        &mut new_lockfile,
    )
    .await;

    new_lockfile
        .write(&lock_path)
        .await
        .context("Failed to write lockfile")?;

    let rendered = result?;

    if let Some(headers_file) = &config.output.headers_file {
        write_headers(headers_file, &paths, &config.output.route).await?;
    }

    info!(
        "Rendered {rendered} images ({up_to_date} up to date, {} removed)",
        stale.len()
    );

    Ok(())
}

/// Renders every job, recording successes in `lockfile`.
///
/// At most `jobs` renders are in flight; each finished image is written
/// before the next job is started. Returns how many images were written.
async fn render_all(
    pending: Vec<Job>,
    renderer: Renderer,
    date_format: DateFormat,
    jobs: usize,
    keep_going: bool,
    multi_progress: &MultiProgress,
    lockfile: &mut Lockfile,
) -> anyhow::Result<usize> {
    if pending.is_empty() {
        return Ok(0);
    }

    let pb = ProgressBar::new(multi_progress, "Rendering", pending.len());
    let mut outcome = Outcome::default();
    let mut set = JoinSet::new();

    let result = async {
        for job in pending {
            if set.len() >= jobs {
                if let Some(joined) = set.join_next().await {
                    outcome.record(joined?, keep_going, &pb, lockfile).await?;
                }
            }

            let renderer = renderer.clone();
            let date_format = date_format.clone();
            set.spawn_blocking(move || {
                let response = response::get(&job.path.props, &renderer, &date_format);
                (job, response)
            });
        }

        while let Some(joined) = set.join_next().await {
            outcome.record(joined?, keep_going, &pb, lockfile).await?;
        }

        anyhow::Ok(())
    }
    .await;

    pb.finish();
    result?;

    if outcome.failed > 0 {
        bail!("{} images failed to render", outcome.failed);
    }

    Ok(outcome.rendered)
}

#[derive(Default)]
struct Outcome {
    rendered: usize,
    failed: usize,
}

impl Outcome {
    async fn record(
        &mut self,
        (job, response): (Job, anyhow::Result<PreviewResponse>),
        keep_going: bool,
        pb: &ProgressBar,
        lockfile: &mut Lockfile,
    ) -> anyhow::Result<()> {
        let slug = job.path.params.slug.as_str();
        pb.set_msg(slug);

        let written = match response {
            Ok(response) => write_image(&job.output, &response).await,
            Err(err) => Err(err),
        };

        match written {
            Ok(()) => {
                debug!("Wrote {}", job.output.display());
                lockfile.insert(slug, LockfileEntry { hash: job.hash });
                self.rendered += 1;
            }
            Err(err) if keep_going => {
                error!("Failed to render image for {slug}: {err:?}");
                self.failed += 1;
            }
            Err(err) => return Err(err.context(format!("Failed to render image for {slug}"))),
        }

        pb.inc(1);
        Ok(())
    }
}

async fn write_image(output: &Path, response: &PreviewResponse) -> anyhow::Result<()> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(output, &response.body).await?;
    Ok(())
}

async fn remove_image(path: &Path) -> anyhow::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => info!("Removed {}", path.display()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("{} was already gone", path.display());
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Writes a Netlify/Cloudflare Pages style `_headers` file so static hosting
/// serves the images with the same headers the route returns.
async fn write_headers(file: &Path, paths: &[StaticPath], route: &str) -> anyhow::Result<()> {
    let headers = PreviewResponse::png(Vec::new()).headers();

    let mut content = String::new();
    for path in paths {
        writeln!(content, "{}", path.route(route))?;
        for (name, value) in &headers {
            writeln!(content, "  {name}: {value}")?;
        }
    }

    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(file, content).await?;
    debug!("Wrote {}", file.display());

    Ok(())
}
