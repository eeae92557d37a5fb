use crate::history::history_entry::HistoryEntry;
use crate::utils::logging::*;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};

enum HistoryCommand {
    Append(HistoryEntry, oneshot::Sender<Result<(), StoreEntry>>),
    List(oneshot::Sender<Vec<HistoryEntry>>),
    Get(String, oneshot::Sender<Option<HistoryEntry>>),
}

/// Handle to the history log.
///
/// A single writer task owns the entries and the backing file; every handle
/// talks to it over one channel, so appends are applied strictly one after
/// another. The file holds one JSON object per line.
#[derive(Clone)]
pub struct HistoryStore {
    sender: mpsc::UnboundedSender<HistoryCommand>,
}

struct HistoryWriter {
    entries: Vec<HistoryEntry>,
    file: Option<HistoryFile>,
}

/// Backing file and the length covered by complete lines.
struct HistoryFile {
    path: PathBuf,
    file: File,
    committed: u64,
}

impl HistoryStore {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreEntry> {
        let path = path.as_ref().to_path_buf();
        let (entries, needs_newline) = Self::load(&path).await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|err| IOEntry::OpenFileError(path.display().to_string(), err))?;
        if needs_newline {
            file.write_all(b"\n").await
                .map_err(|err| IOEntry::WriteFileError(path.display().to_string(), err))?;
            file.flush().await
                .map_err(|err| IOEntry::WriteFileError(path.display().to_string(), err))?;
        }
        let committed = file.metadata().await
            .map_err(|err| IOEntry::ReadFileError(path.display().to_string(), err))?
            .len();
        logging_information!(StoreEntry::Loaded(entries.len()));
        Ok(Self::spawn(HistoryWriter {
            entries,
            file: Some(HistoryFile {
                path,
                file,
                committed,
            }),
        }))
    }

    pub fn in_memory(entries: Vec<HistoryEntry>) -> Self {
        Self::spawn(HistoryWriter {
            entries,
            file: None,
        })
    }

    fn spawn(writer: HistoryWriter) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(writer.run(receiver));
        Self { sender }
    }

    pub async fn append(&self, entry: HistoryEntry) -> Result<(), StoreEntry> {
        let (reply, response) = oneshot::channel();
        self.sender.send(HistoryCommand::Append(entry, reply))
            .map_err(|_| StoreEntry::StoreClosedError)?;
        response.await.map_err(|_| StoreEntry::StoreClosedError)?
    }

    pub async fn list(&self) -> Result<Vec<HistoryEntry>, StoreEntry> {
        let (reply, response) = oneshot::channel();
        self.sender.send(HistoryCommand::List(reply))
            .map_err(|_| StoreEntry::StoreClosedError)?;
        response.await.map_err(|_| StoreEntry::StoreClosedError)
    }

    /// First entry carrying `id`.
    pub async fn get(&self, id: &str) -> Result<HistoryEntry, StoreEntry> {
        let (reply, response) = oneshot::channel();
        self.sender.send(HistoryCommand::Get(id.to_string(), reply))
            .map_err(|_| StoreEntry::StoreClosedError)?;
        response.await
            .map_err(|_| StoreEntry::StoreClosedError)?
            .ok_or_else(|| StoreEntry::HistoryNotFoundError(id.to_string()))
    }

    async fn load(path: &Path) -> Result<(Vec<HistoryEntry>, bool), StoreEntry> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok((Vec::new(), false)),
            Err(err) => return Err(IOEntry::ReadFileError(path.display().to_string(), err).into()),
        };
        if content.trim_start().starts_with('[') {
            let entries = serde_json::from_str::<Vec<HistoryEntry>>(&content)
                .map_err(IOEntry::SerdeDeserializeError)?;
            Self::migrate(path, &entries).await?;
            logging_notice!(StoreEntry::Migrated(entries.len()));
            return Ok((entries, false));
        }
        let mut entries = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(err) => logging_warning!(StoreEntry::CorruptLineSkipped(index + 1, err)),
            }
        }
        let needs_newline = !content.is_empty() && !content.ends_with('\n');
        Ok((entries, needs_newline))
    }

    async fn migrate(path: &Path, entries: &[HistoryEntry]) -> Result<(), StoreEntry> {
        let mut content = String::new();
        for entry in entries {
            content.push_str(&serde_json::to_string(entry).map_err(IOEntry::SerdeSerializeError)?);
            content.push('\n');
        }
        let temporary_path = path.with_extension("migrating");
        fs::write(&temporary_path, content).await
            .map_err(|err| IOEntry::WriteFileError(temporary_path.display().to_string(), err))?;
        fs::rename(&temporary_path, path).await
            .map_err(|err| IOEntry::MoveFileError(temporary_path.display().to_string(), path.display().to_string(), err))?;
        Ok(())
    }
}

impl HistoryWriter {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<HistoryCommand>) {
        while let Some(command) = receiver.recv().await {
            match command {
                HistoryCommand::Append(entry, reply) => {
                    let result = self.append(entry).await;
                    let _ = reply.send(result);
                }
                HistoryCommand::List(reply) => {
                    let _ = reply.send(self.entries.clone());
                }
                HistoryCommand::Get(id, reply) => {
                    let entry = self.entries.iter().find(|entry| entry.id == id).cloned();
                    let _ = reply.send(entry);
                }
            }
        }
    }

    async fn append(&mut self, entry: HistoryEntry) -> Result<(), StoreEntry> {
        if let Some(history_file) = self.file.as_mut() {
            let mut line = serde_json::to_string(&entry).map_err(IOEntry::SerdeSerializeError)?;
            line.push('\n');
            history_file.append_line(line.as_bytes()).await?;
        }
        self.entries.push(entry);
        Ok(())
    }
}

impl HistoryFile {
    /// Appends one complete line. Bytes left behind by a failed write are
    /// cut off, so the next line never starts in the middle of another.
    async fn append_line(&mut self, line: &[u8]) -> Result<(), StoreEntry> {
        self.discard_partial_line().await?;
        if let Err(err) = self.write(line).await {
            if let Err(rollback) = self.file.set_len(self.committed).await {
                logging_error!(IOEntry::WriteFileError(self.path.display().to_string(), rollback));
            }
            return Err(IOEntry::WriteFileError(self.path.display().to_string(), err).into());
        }
        self.committed += line.len() as u64;
        Ok(())
    }

    async fn write(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.file.write_all(line).await?;
        self.file.flush().await?;
        self.file.sync_data().await
    }

    async fn discard_partial_line(&mut self) -> Result<(), StoreEntry> {
        let write_error = |err| IOEntry::WriteFileError(self.path.display().to_string(), err);
        let length = self.file.metadata().await.map_err(write_error)?.len();
        if length > self.committed {
            self.file.set_len(self.committed).await.map_err(write_error)?;
            logging_warning!(StoreEntry::PartialLineDiscarded(length - self.committed));
        }
        Ok(())
    }
}
