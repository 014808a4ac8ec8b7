//! Sample data for demos and UI development.
//!
//! All names and documents are fictional.

use chrono::NaiveDate;
use tracing::warn;

use super::Store;
use crate::models::{
    Animal, AppointmentForm, AppointmentType, ClinicSettings, Client, EntryKind, FinancialEntry,
    PaymentMethod, SaleItem, SaleItemKind, Sex,
};

impl Store {
    /// A store pre-filled with sample clients, animals, appointments,
    /// catalog items and ledger entries.
    pub fn with_sample_data() -> Self {
        let mut store = Store::new();
        store.settings = ClinicSettings {
            clinic_name: "Clínica Veterinária Bicho Feliz".into(),
            address: "Rua das Palmeiras, 250 - São Paulo/SP".into(),
            phone: "(11) 3333-4444".into(),
            email: "contato@bichofeliz.vet.br".into(),
            responsible_vet: "Dra. Marina Alves".into(),
            crmv: "CRMV-SP 12345".into(),
            veterinarians: vec!["Dra. Marina Alves".into(), "Dr. Paulo Mendes".into()],
        };

        let mut ana = Client::new("Ana Souza".into());
        ana.cpf = Some("123.456.789-09".into());
        ana.phone = Some("(11) 98888-7777".into());
        ana.email = Some("ana.souza@email.com".into());
        ana.address = Some("Av. Paulista, 1000, ap. 52".into());

        let mut carlos = Client::new("Carlos Pereira".into());
        carlos.cpf = Some("987.654.321-00".into());
        carlos.phone = Some("(11) 97777-1234".into());

        let mut thor = Animal::new(ana.id.clone(), "Thor".into(), "Canina".into());
        thor.breed = Some("Labrador".into());
        thor.sex = Sex::Male;
        thor.birth_date = NaiveDate::from_ymd_opt(2019, 4, 12);
        thor.weight_kg = Some(31.2);

        let mut mia = Animal::new(ana.id.clone(), "Mia".into(), "Felina".into());
        mia.breed = Some("SRD".into());
        mia.sex = Sex::Female;
        mia.birth_date = NaiveDate::from_ymd_opt(2021, 9, 3);
        mia.weight_kg = Some(4.1);

        let mut bob = Animal::new(carlos.id.clone(), "Bob".into(), "Canina".into());
        bob.breed = Some("Shih-tzu".into());
        bob.sex = Sex::Male;

        let carlos_id = carlos.id.clone();
        let thor_id = thor.id.clone();
        for client in [ana, carlos] {
            if let Err(err) = store.insert_client(client) {
                warn!(%err, "Sample client skipped");
            }
        }
        for animal in [thor, mia, bob] {
            if let Err(err) = store.insert_animal(animal) {
                warn!(%err, "Sample animal skipped");
            }
        }

        let consultation = AppointmentForm {
            date: NaiveDate::from_ymd_opt(2024, 3, 18),
            appointment_type: Some(AppointmentType::Consultation.into()),
            veterinarian: Some("Dra. Marina Alves".into()),
            weight_kg: Some(31.2),
            temperature_c: Some(38.7),
            heart_rate: Some(96),
            respiratory_rate: Some(24),
            anamnesis: Some("Claudicação do membro pélvico esquerdo há 3 dias.".into()),
            diagnosis: Some("Suspeita de displasia coxofemoral.".into()),
            ..Default::default()
        };
        if let Err(err) = store.save_appointment(&thor_id, &consultation) {
            warn!(%err, "Sample appointment skipped");
        }

        for (sku, name, kind, price) in [
            ("CONS-01", "Consulta clínica", SaleItemKind::Service, 15_000),
            ("VAC-V10", "Vacina V10", SaleItemKind::Service, 9_000),
            ("VAC-RAB", "Vacina antirrábica", SaleItemKind::Service, 6_000),
            ("RAC-15", "Ração premium 15kg", SaleItemKind::Product, 28_990),
            ("ANTIPULGA", "Antipulgas comprimido", SaleItemKind::Product, 8_950),
        ] {
            if let Err(err) = store.upsert_sale_item(SaleItem::new(sku.into(), name.into(), kind, price)) {
                warn!(sku, %err, "Sample catalog item skipped");
            }
        }

        let mut sale = FinancialEntry::new(EntryKind::Income, "Consulta clínica".into(), 15_000);
        sale.payment_method = Some(PaymentMethod::Pix);
        sale.client_id = Some(carlos_id);
        let restock = FinancialEntry::new(EntryKind::Expense, "Reposição de estoque".into(), 42_000);
        for entry in [sale, restock] {
            if let Err(err) = store.record_entry(entry) {
                warn!(%err, "Sample ledger entry skipped");
            }
        }

        store
    }
}
