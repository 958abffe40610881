use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.next_u64() % 100 < percent
    }
}

struct Contact {
    id: i64,
    name: String,
    photo_id: Option<i64>,
    lookup: String,
    account_type: &'static str,
    account_name: &'static str,
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let first = [
        "Ada", "Alan", "Barbara", "Claude", "Dennis", "Edsger", "Frances", "Grace", "Hedy",
        "John", "Ken", "Linus", "Margaret", "Niklaus", "Radia", "Tony",
    ];
    let last = [
        "Allen", "Backus", "Hopper", "Kernighan", "Knuth", "Liskov", "Perlman", "Ritchie",
        "Thompson", "Turing", "Wirth",
    ];
    let accounts = [
        ("com.google", "me@example.com"),
        ("com.google", "work@example.com"),
        ("com.example.local", "Phone"),
    ];

    let contacts: Vec<Contact> = (1..=120)
        .map(|id| {
            let (account_type, account_name) = accounts[(rng.next_u64() % 3) as usize];
            Contact {
                id,
                name: format!("{} {}", rng.pick(&first), rng.pick(&last)),
                photo_id: rng.chance(30).then_some(1000 + id),
                lookup: format!("0r{id}-{:x}", rng.next_u64() & 0xffff),
                account_type,
                account_name,
            }
        })
        .collect();

    // Roughly a fifth of the first account's contacts are already in the group.
    let members: Vec<String> = contacts
        .iter()
        .filter(|c| c.account_name == accounts[0].1)
        .filter(|_| rng.chance(20))
        .map(|c| c.id.to_string())
        .collect();

    write_parquet(&contacts, "sample_contacts.parquet");
    write_json(&contacts, "sample_contacts.json");
    write_csv(&contacts, "sample_contacts.csv");

    let members_json = serde_json::to_string_pretty(&members).expect("Failed to serialize members");
    std::fs::write("sample_group_members.json", members_json).expect("Failed to write members");

    println!(
        "Wrote {} contacts ({} already in the group of {}) to sample_contacts.*",
        contacts.len(),
        members.len(),
        accounts[0].1
    );
}

fn write_parquet(contacts: &[Contact], output_path: &str) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("contact_id", DataType::Int64, false),
        Field::new("display_name", DataType::Utf8, true),
        Field::new("photo_id", DataType::Int64, true),
        Field::new("lookup", DataType::Utf8, true),
        Field::new("account_type", DataType::Utf8, false),
        Field::new("account_name", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(contacts.iter().map(|c| c.id))),
            Arc::new(StringArray::from_iter_values(contacts.iter().map(|c| c.name.as_str()))),
            Arc::new(Int64Array::from(contacts.iter().map(|c| c.photo_id).collect::<Vec<_>>())),
            Arc::new(StringArray::from_iter_values(contacts.iter().map(|c| c.lookup.as_str()))),
            Arc::new(StringArray::from_iter_values(contacts.iter().map(|c| c.account_type))),
            Arc::new(StringArray::from_iter_values(contacts.iter().map(|c| c.account_name))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn write_json(contacts: &[Contact], output_path: &str) {
    let records: Vec<serde_json::Value> = contacts
        .iter()
        .map(|c| {
            serde_json::json!({
                "contact_id": c.id,
                "display_name": c.name,
                "photo_id": c.photo_id,
                "lookup": c.lookup,
                "account_type": c.account_type,
                "account_name": c.account_name,
            })
        })
        .collect();
    let text = serde_json::to_string_pretty(&records).expect("Failed to serialize contacts");
    std::fs::write(output_path, text).expect("Failed to write JSON");
}

fn write_csv(contacts: &[Contact], output_path: &str) {
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create CSV");
    writer
        .write_record(["contact_id", "display_name", "photo_id", "lookup", "account_type", "account_name"])
        .expect("Failed to write CSV header");
    for c in contacts {
        let photo = c.photo_id.map(|p| p.to_string()).unwrap_or_default();
        writer
            .write_record([
                c.id.to_string().as_str(),
                c.name.as_str(),
                photo.as_str(),
                c.lookup.as_str(),
                c.account_type,
                c.account_name,
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");
}
