use crate::domain::{Record, RecordKind};

pub fn records_to_csv(kind: RecordKind, records: &[Record]) -> Result<Vec<u8>, csv::Error> {
    let label_header = match kind {
        RecordKind::Income => "Source",
        RecordKind::Expense => "Category",
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([label_header, "Amount", "Date"])?;

    for record in records {
        let amount = record.amount.to_string();
        let date = record.occurred_on.to_string();
        writer.write_record([record.label.as_str(), amount.as_str(), date.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

pub fn export_filename(kind: RecordKind) -> String {
    format!("{}_details.csv", kind.as_str())
}
