use crudgen::config::CodegenConfig;
use crudgen::page_generator::PageGenerator;
use crudgen::validation::{validate_entity_file, validate_output_dir, validate_templates};
use crudgen::template::TemplateSource;
use crudgen::ErrorKind;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join(format!("{name}.json")),
        serde_json::to_string_pretty(&value).unwrap(),
    )
    .unwrap();
}

fn workspace() -> (TempDir, CodegenConfig) {
    let tmp = tempfile::tempdir().unwrap();
    let config = CodegenConfig {
        entities_dir: tmp.path().join(".jhipster"),
        output_dir: tmp.path().join("app"),
        ..CodegenConfig::default()
    };

    write_json(
        &config.entities_dir,
        "City",
        json!({ "name": "City", "fields": [
            { "fieldName": "name", "fieldType": "String", "fieldValidateRules": ["required"] }
        ] }),
    );
    write_json(
        &config.entities_dir,
        "Call",
        json!({
            "name": "Call",
            "fields": [
                { "fieldName": "subject", "fieldType": "String",
                  "fieldValidateRules": ["required", "maxlength"], "fieldValidateRulesMaxlength": 120 },
                { "fieldName": "status", "fieldType": "CallStatus", "fieldValues": "OPEN,CLOSED" },
                { "fieldName": "callDate", "fieldType": "Instant" },
                { "fieldName": "isUrgent", "fieldType": "Boolean" }
            ],
            "relationships": [
                { "relationshipName": "city", "relationshipType": "many-to-one",
                  "otherEntityName": "city", "otherEntityField": "name" },
                { "relationshipName": "parties", "relationshipType": "many-to-many",
                  "otherEntityName": "party", "ownerSide": true }
            ],
            "pagination": "pagination"
        }),
    );
    write_json(
        &config.entities_dir,
        "AuditLog",
        json!({ "name": "AuditLog", "readOnly": true, "pagination": "no", "fields": [
            { "fieldName": "message", "fieldType": "TextBlob" }
        ] }),
    );

    (tmp, config)
}

#[test]
fn generates_the_route_tree() {
    let (_tmp, config) = workspace();
    let generator = PageGenerator::new(&config).unwrap();

    let report = generator.generate_entity("call").unwrap();

    assert_eq!(report.entity, "Call");
    assert_eq!(report.files.len(), 8);

    let route = config.output_dir.join("calls");
    for relative in [
        "page.tsx",
        "new/page.tsx",
        "[id]/page.tsx",
        "[id]/edit/page.tsx",
        "components/call-table.tsx",
        "components/call-details.tsx",
        "components/call-form.tsx",
        "components/call-form-schema.ts",
    ] {
        assert!(route.join(relative).is_file(), "missing {relative}");
    }

    let schema = fs::read_to_string(route.join("components/call-form-schema.ts")).unwrap();
    assert!(schema.contains("export const callFormSchema = z.object({"));
    assert!(schema.contains("  subject: z.string().min(1, { message: \"Please enter Subject\" }).max(120),\n"));
    assert!(schema.contains("  status: z.enum([\"OPEN\", \"CLOSED\"]).optional(),\n"));
    assert!(schema.contains("  city: z.number().optional(),\n"));
    assert!(schema.contains("  parties: z.array(z.number()).optional(),\n"));
    assert!(schema.contains("export const statusOptions = ["));
    assert!(!schema.contains("[["));

    let form = fs::read_to_string(route.join("components/call-form.tsx")).unwrap();
    assert!(form.contains("import { useGetAllCities } from \"@/core/api/generated/spring/endpoints/city-resource/city-resource.gen\";"));
    assert!(form.contains("import { useGetAllParties } from"));
    assert!(form.contains("export function CallForm({ id }: CallFormProps)"));

    let table = fs::read_to_string(route.join("components/call-table.tsx")).unwrap();
    assert!(table.contains("useGetAllCalls"));
    assert!(table.contains("useDeleteCall"));
    assert!(table.contains("<Link href={`/cities/${call.city.id}`}>"));
}

#[test]
fn descriptor_is_flagged_in_place() {
    let (_tmp, config) = workspace();
    let generator = PageGenerator::new(&config).unwrap();

    generator.generate_entity("Call").unwrap();

    let text = fs::read_to_string(config.entities_dir.join("Call.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["fields"][1]["fieldIsEnum"], json!(true));
}

#[test]
fn read_only_entities_skip_forms() {
    let (_tmp, config) = workspace();
    let generator = PageGenerator::new(&config).unwrap();

    let report = generator.generate_entity("audit-log").unwrap();
    let route = config.output_dir.join("audit-logs");

    assert_eq!(report.files.len(), 4);
    assert!(route.join("page.tsx").is_file());
    assert!(!route.join("new").exists());
    assert!(!route.join("components/audit-log-form.tsx").exists());

    let page = fs::read_to_string(route.join("page.tsx")).unwrap();
    assert!(!page.contains("Create Audit Log"));

    let table = fs::read_to_string(route.join("components/audit-log-table.tsx")).unwrap();
    assert!(!table.contains("Previous"));
    assert!(!table.contains("useDeleteAuditLog"));
}

#[test]
fn generate_all_covers_every_descriptor() {
    let (_tmp, config) = workspace();
    let generator = PageGenerator::new(&config).unwrap();

    let reports = generator.generate_all().unwrap();
    let names: Vec<_> = reports.iter().map(|r| r.entity.as_str()).collect();

    assert_eq!(names, ["AuditLog", "Call", "City"]);
    assert!(config.output_dir.join("cities/components/city-table.tsx").is_file());
}

#[test]
fn existing_route_requires_force() {
    let (_tmp, mut config) = workspace();

    PageGenerator::new(&config).unwrap().generate_entity("City").unwrap();

    let err = PageGenerator::new(&config)
        .unwrap()
        .generate_entity("City")
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    assert_eq!(err.entity.as_deref(), Some("City"));

    config.force = true;
    PageGenerator::new(&config).unwrap().generate_entity("City").unwrap();
}

#[test]
fn dry_run_writes_nothing() {
    let (_tmp, config) = workspace();
    let generator = PageGenerator::new(&config).unwrap().dry_run(true);

    let report = generator.generate_entity("Call").unwrap();

    assert!(report.dry_run);
    assert_eq!(report.files.len(), 8);
    assert!(!config.output_dir.exists());

    // the descriptor is left untouched as well
    let text = fs::read_to_string(config.entities_dir.join("Call.json")).unwrap();
    assert!(!text.contains("fieldIsEnum"));
}

#[test]
fn invalid_entity_aborts_the_run() {
    let (_tmp, config) = workspace();
    write_json(
        &config.entities_dir,
        "Broken",
        json!({ "name": "Broken", "fields": [], "relationships": [
            { "relationshipName": "owner", "relationshipType": "belongs-to", "otherEntityName": "party" }
        ] }),
    );

    let err = PageGenerator::new(&config).unwrap().generate_all().unwrap_err();

    assert!(err.is(ErrorKind::Validation));
    assert_eq!(err.entity.as_deref(), Some("Broken"));
}

#[test]
fn unknown_entity_is_reported() {
    let (_tmp, config) = workspace();

    let err = PageGenerator::new(&config)
        .unwrap()
        .generate_entity("Meeting")
        .unwrap_err();

    assert!(err.is(ErrorKind::Entity));
}

#[test]
fn template_directory_must_be_complete_and_balanced() {
    let (tmp, mut config) = workspace();
    let templates = tmp.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("page.tsx.tpl"), "[[ entity.class_name ]]").unwrap();
    config.templates_dir = Some(templates.clone());

    let err = validate_templates(&config.template_source()).unwrap_err();
    assert!(err.is(ErrorKind::Template));
    assert!(err.message.contains("missing template"));
    assert!(PageGenerator::new(&config).is_err());

    for entry in crudgen::template::MANIFEST {
        fs::write(templates.join(entry.template), "// [[ entity.class_name ]]\n").unwrap();
    }
    validate_templates(&TemplateSource::Directory(templates.clone())).unwrap();

    fs::write(templates.join("entity-form.tsx.tpl"), "[[ entity.class_name ]").unwrap();
    let err = validate_templates(&TemplateSource::Directory(templates)).unwrap_err();
    assert!(err.message.contains("mismatched delimiters"));
}

#[test]
fn custom_templates_drive_the_output() {
    let (tmp, mut config) = workspace();
    let templates = tmp.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    for entry in crudgen::template::MANIFEST {
        fs::write(
            templates.join(entry.template),
            "[[ entity.route_name ]]:[[#each entity.fields]][[ name ]][[#unless @last]],[[/unless]][[/each]]",
        )
        .unwrap();
    }
    config.templates_dir = Some(templates);

    PageGenerator::new(&config).unwrap().generate_entity("Call").unwrap();

    let page = fs::read_to_string(config.output_dir.join("calls/page.tsx")).unwrap();
    assert_eq!(page, "calls:subject,status,callDate,isUrgent");
}

#[test]
fn output_dir_probe() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("fresh/route");

    validate_output_dir(&dir, false).unwrap();
    assert!(dir.is_dir());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

    let err = validate_output_dir(&dir, false).unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    validate_output_dir(&dir, true).unwrap();
}

#[test]
fn validate_entity_file_reports_file_stem() {
    let tmp = tempfile::tempdir().unwrap();
    write_json(tmp.path(), "Nameless", json!({ "fields": [] }));

    let err = validate_entity_file(&tmp.path().join("Nameless.json")).unwrap_err();

    assert!(err.is(ErrorKind::Validation));
    assert_eq!(err.entity.as_deref(), Some("Nameless"));
}

#[test]
fn failed_render_leaves_no_route_dir() {
    let (tmp, mut config) = workspace();
    let templates = tmp.path().join("templates");
    fs::create_dir_all(&templates).unwrap();
    for entry in crudgen::template::MANIFEST {
        fs::write(templates.join(entry.template), "[[ entity.class_name ]]\n").unwrap();
    }
    fs::write(templates.join("page.tsx.tpl"), "[[ entity.typo ]]\n").unwrap();
    config.templates_dir = Some(templates.clone());

    let err = PageGenerator::new(&config)
        .unwrap()
        .generate_entity("City")
        .unwrap_err();
    assert!(err.is(ErrorKind::Template));
    assert!(!config.output_dir.join("cities").exists());

    fs::write(templates.join("page.tsx.tpl"), "[[ entity.class_name ]]\n").unwrap();
    PageGenerator::new(&config).unwrap().generate_entity("City").unwrap();
    assert!(config.output_dir.join("cities/page.tsx").is_file());
}

#[test]
fn null_relationships_generate() {
    let (_tmp, config) = workspace();
    write_json(
        &config.entities_dir,
        "Area",
        json!({ "name": "Area", "fields": [
            { "fieldName": "name", "fieldType": "String" }
        ], "relationships": null }),
    );

    let report = PageGenerator::new(&config).unwrap().generate_entity("Area").unwrap();

    assert_eq!(report.files.len(), 8);
}

#[test]
fn infinite_scroll_loads_more() {
    let (_tmp, config) = workspace();
    write_json(
        &config.entities_dir,
        "Party",
        json!({ "name": "Party", "pagination": "infinite-scroll", "fields": [
            { "fieldName": "name", "fieldType": "String" }
        ] }),
    );

    PageGenerator::new(&config).unwrap().generate_entity("Party").unwrap();

    let table =
        fs::read_to_string(config.output_dir.join("parties/components/party-table.tsx")).unwrap();
    assert!(table.contains("size: PAGE_SIZE * (page + 1),"));
    assert!(table.contains("Load more"));
    assert!(!table.contains("Previous"));

    PageGenerator::new(&config).unwrap().generate_entity("Call").unwrap();
    let table =
        fs::read_to_string(config.output_dir.join("calls/components/call-table.tsx")).unwrap();
    assert!(table.contains("    page,\n    size: PAGE_SIZE,\n"));
    assert!(table.contains("Previous"));
    assert!(!table.contains("Load more"));
}
